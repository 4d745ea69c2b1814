//! Indexer adapters.
//!
//! Each adapter owns its request shape and response schema and maps results
//! into [`DownloadCandidate`](super::DownloadCandidate)s. All network access
//! goes through the injected [`Transport`].

mod apibay;
mod eztv;
mod solidtorrents;
mod yts;

pub use apibay::ApibaySource;
pub use eztv::EztvSource;
pub use solidtorrents::SolidtorrentsSource;
pub use yts::YtsSource;

use std::sync::Arc;

use serde::{Deserialize, Deserializer};

use crate::config::{SourceConfig, SourcesConfig};

use super::{MagnetBuilder, Source, Transport};

const MIB: f64 = 1_048_576.0;
const GIB: u64 = 1_073_741_824;

/// Endpoint settings shared by every adapter.
#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub base_url: String,
    /// Maximum entries consumed per query.
    pub limit: u32,
}

impl From<&SourceConfig> for SourceSettings {
    fn from(config: &SourceConfig) -> Self {
        Self {
            base_url: config.base_url.clone(),
            limit: config.limit,
        }
    }
}

impl SourceSettings {
    /// `<base_url>/<path>` without doubled slashes.
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Build every enabled adapter, sharing one transport.
pub fn create_sources(
    config: &SourcesConfig,
    transport: Arc<dyn Transport>,
    magnet: MagnetBuilder,
) -> Vec<Arc<dyn Source>> {
    let mut sources: Vec<Arc<dyn Source>> = Vec::new();

    if config.yts.enabled {
        sources.push(Arc::new(YtsSource::new(
            (&config.yts).into(),
            Arc::clone(&transport),
            magnet.clone(),
        )));
    }
    if config.eztv.enabled {
        sources.push(Arc::new(EztvSource::new(
            (&config.eztv).into(),
            Arc::clone(&transport),
            magnet.clone(),
        )));
    }
    if config.apibay.enabled {
        sources.push(Arc::new(ApibaySource::new(
            (&config.apibay).into(),
            Arc::clone(&transport),
            magnet.clone(),
        )));
    }
    if config.solidtorrents.enabled {
        sources.push(Arc::new(SolidtorrentsSource::new(
            (&config.solidtorrents).into(),
            transport,
            magnet,
        )));
    }

    sources
}

/// "123.4 MB"
fn format_mb(bytes: u64) -> String {
    format!("{:.1} MB", bytes as f64 / MIB)
}

/// "1.50 GB" from 1 GiB upwards, "512.00 MB" below.
fn format_gb_or_mb(bytes: u64) -> String {
    if bytes >= GIB {
        format_gb(bytes)
    } else {
        format!("{:.2} MB", bytes as f64 / MIB)
    }
}

/// "0.75 GB"
fn format_gb(bytes: u64) -> String {
    format!("{:.2} GB", bytes as f64 / GIB as f64)
}

/// Indexers disagree on whether counters are numbers or strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum LenientNumber {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
}

impl LenientNumber {
    fn into_u64(self) -> u64 {
        match self {
            LenientNumber::Unsigned(n) => n,
            LenientNumber::Signed(n) => n.max(0) as u64,
            LenientNumber::Float(n) if n.is_finite() && n > 0.0 => n as u64,
            LenientNumber::Float(_) => 0,
            LenientNumber::Text(s) => s.trim().parse().unwrap_or(0),
        }
    }
}

/// Deserialize a counter given as a number, a numeric string, or null (0).
fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<LenientNumber>::deserialize(deserializer)?
        .map(LenientNumber::into_u64)
        .unwrap_or(0))
}

/// Deserialize an identifier given as a string or a number. Absent or null stays `None`.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(
        Option::<LenientNumber>::deserialize(deserializer)?.map(|raw| match raw {
            LenientNumber::Unsigned(n) => n.to_string(),
            LenientNumber::Signed(n) => n.to_string(),
            LenientNumber::Float(n) => n.to_string(),
            LenientNumber::Text(s) => s.trim().to_string(),
        }),
    )
}

/// Same as [`lenient_u64`], saturated to `u32`.
fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_u64(deserializer).map(|n| n.min(u32::MAX as u64) as u32)
}
