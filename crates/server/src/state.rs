use seedscout_core::{Aggregator, Config, SanitizedConfig};
use tokio_util::sync::CancellationToken;

/// Shared application state
pub struct AppState {
    config: Config,
    aggregator: Aggregator,
    /// Cancelled on process shutdown; request tokens are children of it.
    shutdown: CancellationToken,
}

impl AppState {
    pub fn new(config: Config, aggregator: Aggregator, shutdown: CancellationToken) -> Self {
        Self {
            config,
            aggregator,
            shutdown,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown
    }
}
