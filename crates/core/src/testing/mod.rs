//! Testing utilities and mock implementations.
//!
//! Mocks for the two seams of the core: [`MockSource`] stands in for an
//! indexer adapter, [`MockTransport`] for the network underneath the real
//! adapters.
//!
//! # Example
//!
//! ```rust,ignore
//! use seedscout_core::testing::{fixtures, MockSource, MockTransport};
//!
//! let transport = MockTransport::new();
//! transport.respond("q.php", r#"[...]"#).await;
//!
//! let source = MockSource::with_results(SourceId::Apibay, vec![
//!     fixtures::candidate("abc123", 50, SourceId::Apibay),
//! ]);
//! ```

mod mock_source;
mod mock_transport;

pub use mock_source::{MockSource, RecordedQuery};
pub use mock_transport::MockTransport;

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::searcher::{magnet_uri, DownloadCandidate, Quality, SourceId};

    /// Create a candidate with reasonable defaults.
    pub fn candidate(identity_hash: &str, seeders: u32, source: SourceId) -> DownloadCandidate {
        let title = format!("Fixture.{}.1080p.WEB-DL", identity_hash);
        DownloadCandidate {
            identity_hash: identity_hash.to_string(),
            source_locator: magnet_uri(identity_hash, &title, &[]),
            title,
            source,
            quality: Quality::P1080,
            encoding_tag: "WEB-DL".to_string(),
            seeders,
            leechers: 1,
            size_label: "1.00 GB".to_string(),
            uploaded_label: "Recent".to_string(),
        }
    }

    /// Create a candidate with a specific release name.
    pub fn titled_candidate(
        identity_hash: &str,
        title: &str,
        seeders: u32,
        source: SourceId,
    ) -> DownloadCandidate {
        DownloadCandidate {
            title: title.to_string(),
            source_locator: magnet_uri(identity_hash, title, &[]),
            ..candidate(identity_hash, seeders, source)
        }
    }
}
