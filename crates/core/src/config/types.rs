use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub transport: TransportConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub magnet: MagnetConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// How outbound indexer requests leave the process.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    /// Call indexers directly.
    #[default]
    Direct,
    /// Forward every request through a URL-in-URL relay.
    Relay,
}

/// Outbound HTTP transport configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransportConfig {
    #[serde(default)]
    pub mode: TransportMode,
    /// Relay prefix; the url-encoded target is appended verbatim
    /// (e.g. "https://corsproxy.io/?url=").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relay_url: Option<String>,
    /// Request timeout in seconds (default: 20)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            mode: TransportMode::default(),
            relay_url: None,
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout() -> u32 {
    20
}

fn default_user_agent() -> String {
    concat!("seedscout/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Per-indexer settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub base_url: String,
    /// Maximum entries consumed from this indexer per query.
    pub limit: u32,
}

fn default_enabled() -> bool {
    true
}

impl SourceConfig {
    fn with_defaults(base_url: &str, limit: u32) -> Self {
        Self {
            enabled: true,
            base_url: base_url.to_string(),
            limit,
        }
    }
}

/// All indexer sections. Missing sections fall back to public endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourcesConfig {
    #[serde(default = "default_yts")]
    pub yts: SourceConfig,
    #[serde(default = "default_eztv")]
    pub eztv: SourceConfig,
    #[serde(default = "default_apibay")]
    pub apibay: SourceConfig,
    #[serde(default = "default_solidtorrents")]
    pub solidtorrents: SourceConfig,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            yts: default_yts(),
            eztv: default_eztv(),
            apibay: default_apibay(),
            solidtorrents: default_solidtorrents(),
        }
    }
}

fn default_yts() -> SourceConfig {
    SourceConfig::with_defaults("https://yts.mx/api/v2", 10)
}

fn default_eztv() -> SourceConfig {
    SourceConfig::with_defaults("https://eztvx.to/api", 10)
}

fn default_apibay() -> SourceConfig {
    SourceConfig::with_defaults("https://apibay.org", 10)
}

fn default_solidtorrents() -> SourceConfig {
    SourceConfig::with_defaults("https://solidtorrents.to/api/v1", 8)
}

/// Magnet locator configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MagnetConfig {
    #[serde(default = "default_trackers")]
    pub trackers: Vec<String>,
}

impl Default for MagnetConfig {
    fn default() -> Self {
        Self {
            trackers: default_trackers(),
        }
    }
}

fn default_trackers() -> Vec<String> {
    [
        "udp://tracker.opentrackr.org:1337/announce",
        "udp://open.demonii.com:1337/announce",
        "udp://tracker.openbittorrent.com:6969/announce",
        "udp://exodus.desync.com:6969/announce",
        "udp://tracker.torrent.eu.org:451/announce",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Sanitized config for API responses (relay address hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub transport: SanitizedTransportConfig,
    pub sources: SourcesConfig,
    pub tracker_count: usize,
}

/// Relay URLs often embed an access key, so only report whether one is set.
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTransportConfig {
    pub mode: TransportMode,
    pub relay_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            transport: SanitizedTransportConfig {
                mode: config.transport.mode,
                relay_configured: config
                    .transport
                    .relay_url
                    .as_deref()
                    .is_some_and(|u| !u.is_empty()),
                timeout_secs: config.transport.timeout_secs,
            },
            sources: config.sources.clone(),
            tracker_count: config.magnet.trackers.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.transport.mode, TransportMode::Direct);
        assert_eq!(config.transport.timeout_secs, 20);
        assert_eq!(config.sources.yts.limit, 10);
        assert_eq!(config.sources.solidtorrents.limit, 8);
        assert!(config.sources.eztv.enabled);
        assert!(!config.magnet.trackers.is_empty());
    }

    #[test]
    fn test_deserialize_relay_transport() {
        let toml = r#"
[transport]
mode = "relay"
relay_url = "https://corsproxy.io/?url="
timeout_secs = 5
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.transport.mode, TransportMode::Relay);
        assert_eq!(
            config.transport.relay_url.as_deref(),
            Some("https://corsproxy.io/?url=")
        );
        assert_eq!(config.transport.timeout_secs, 5);
    }

    #[test]
    fn test_deserialize_source_override() {
        let toml = r#"
[sources.apibay]
enabled = false
base_url = "http://localhost:9000"
limit = 3
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.sources.apibay.enabled);
        assert_eq!(config.sources.apibay.base_url, "http://localhost:9000");
        assert_eq!(config.sources.apibay.limit, 3);
        // untouched sections keep their defaults
        assert_eq!(config.sources.yts.base_url, "https://yts.mx/api/v2");
    }

    #[test]
    fn test_deserialize_source_enabled_defaults_true() {
        let toml = r#"
[sources.eztv]
base_url = "http://localhost:9001"
limit = 4
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.sources.eztv.enabled);
    }

    #[test]
    fn test_unknown_transport_mode_fails() {
        let toml = r#"
[transport]
mode = "carrier_pigeon"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_sanitized_config_hides_relay() {
        let mut config = Config::default();
        config.transport.mode = TransportMode::Relay;
        config.transport.relay_url = Some("https://relay.example/?key=secret&url=".to_string());

        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.transport.relay_configured);
        assert_eq!(sanitized.tracker_count, config.magnet.trackers.len());

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_sanitized_config_without_relay() {
        let sanitized = SanitizedConfig::from(&Config::default());
        assert!(!sanitized.transport.relay_configured);
        assert_eq!(sanitized.server.port, 8080);
    }
}
