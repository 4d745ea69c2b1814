use super::{
    types::{Config, SourceConfig, TransportMode},
    ConfigError,
};

/// Largest per-source page an indexer is asked for.
const MAX_SOURCE_LIMIT: u32 = 50;

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Transport timeout is positive, relay mode has a usable relay URL
/// - Every source has a base URL and a limit in 1..=50
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.transport.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "transport.timeout_secs must be greater than 0".to_string(),
        ));
    }

    if config.transport.mode == TransportMode::Relay {
        match config.transport.relay_url.as_deref() {
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {}
            Some(_) => {
                return Err(ConfigError::ValidationError(
                    "transport.relay_url must be an http(s) URL".to_string(),
                ))
            }
            None => {
                return Err(ConfigError::ValidationError(
                    "transport.relay_url is required when transport.mode = \"relay\"".to_string(),
                ))
            }
        }
    }

    let sources = &config.sources;
    for (name, source) in [
        ("yts", &sources.yts),
        ("eztv", &sources.eztv),
        ("apibay", &sources.apibay),
        ("solidtorrents", &sources.solidtorrents),
    ] {
        validate_source(name, source)?;
    }

    Ok(())
}

fn validate_source(name: &str, source: &SourceConfig) -> Result<(), ConfigError> {
    if source.base_url.trim().is_empty() {
        return Err(ConfigError::ValidationError(format!(
            "sources.{}.base_url cannot be empty",
            name
        )));
    }
    if source.limit == 0 || source.limit > MAX_SOURCE_LIMIT {
        return Err(ConfigError::ValidationError(format!(
            "sources.{}.limit must be between 1 and {}",
            name, MAX_SOURCE_LIMIT
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use std::net::IpAddr;

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                host: "0.0.0.0".parse::<IpAddr>().unwrap(),
                port: 0,
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_zero_timeout_fails() {
        let mut config = Config::default();
        config.transport.timeout_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_relay_requires_url() {
        let mut config = Config::default();
        config.transport.mode = TransportMode::Relay;
        assert!(validate_config(&config).is_err());

        config.transport.relay_url = Some("corsproxy.io/?".to_string());
        assert!(validate_config(&config).is_err());

        config.transport.relay_url = Some("https://corsproxy.io/?url=".to_string());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_source_limit_bounds() {
        let mut config = Config::default();
        config.sources.apibay.limit = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("sources.apibay.limit"));

        config.sources.apibay.limit = 51;
        assert!(validate_config(&config).is_err());

        config.sources.apibay.limit = 50;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_empty_base_url_fails() {
        let mut config = Config::default();
        config.sources.eztv.base_url = "  ".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("sources.eztv.base_url"));
    }
}
