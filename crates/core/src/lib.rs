pub mod config;
pub mod metrics;
pub mod searcher;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
    TransportMode,
};
pub use searcher::{
    magnet_uri, AggregateResult, Aggregator, DownloadCandidate, MediaKind, Quality, QueryContext,
    QueryError, Source, SourceError, SourceId,
};
