//! Magnet locator construction.

use crate::config::MagnetConfig;

/// Build `magnet:?xt=urn:btih:<hash>&dn=<name>[&tr=<tracker>...]`.
///
/// The display name and trackers are url-encoded; the hash is passed as-is.
pub fn magnet_uri(info_hash: &str, display_name: &str, trackers: &[String]) -> String {
    let mut uri = format!(
        "magnet:?xt=urn:btih:{}&dn={}",
        info_hash,
        urlencoding::encode(display_name)
    );
    for tracker in trackers {
        uri.push_str("&tr=");
        uri.push_str(&urlencoding::encode(tracker));
    }
    uri
}

/// Builds magnet locators with a fixed tracker list.
#[derive(Debug, Clone, Default)]
pub struct MagnetBuilder {
    trackers: Vec<String>,
}

impl MagnetBuilder {
    pub fn new(trackers: Vec<String>) -> Self {
        Self { trackers }
    }

    pub fn from_config(config: &MagnetConfig) -> Self {
        Self::new(config.trackers.clone())
    }

    pub fn build(&self, info_hash: &str, display_name: &str) -> String {
        magnet_uri(info_hash, display_name, &self.trackers)
    }

    pub fn trackers(&self) -> &[String] {
        &self.trackers
    }
}
