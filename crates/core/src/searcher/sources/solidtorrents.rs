//! Second general swarm search (solidtorrents-style API).

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{format_gb, lenient_u32, lenient_u64, SourceSettings};
use crate::searcher::title_parser::parse_title;
use crate::searcher::{
    DownloadCandidate, MagnetBuilder, QueryContext, Source, SourceError, SourceId, Transport,
};

const UPLOADED_LABEL: &str = "Recent";

pub struct SolidtorrentsSource {
    settings: SourceSettings,
    transport: Arc<dyn Transport>,
    magnet: MagnetBuilder,
}

impl SolidtorrentsSource {
    pub fn new(settings: SourceSettings, transport: Arc<dyn Transport>, magnet: MagnetBuilder) -> Self {
        Self {
            settings,
            transport,
            magnet,
        }
    }

    fn build_search_url(&self, ctx: &QueryContext) -> String {
        format!(
            "{}?q={}&category=Video&sort=seeders",
            self.settings.endpoint("search"),
            urlencoding::encode(ctx.display_title.trim())
        )
    }

    fn parse_response(
        &self,
        body: &str,
        ctx: &QueryContext,
    ) -> Result<Vec<DownloadCandidate>, SourceError> {
        let response: SolidResponse = serde_json::from_str(body)?;

        if response.success == Some(false) {
            return Err(SourceError::ApiError("search was not successful".to_string()));
        }

        Ok(response
            .results
            .unwrap_or_default()
            .into_iter()
            .filter(|r| !r.infohash.trim().is_empty())
            .take(self.settings.limit as usize)
            .map(|r| {
                let parsed = parse_title(&r.title);
                let hash = r.infohash.trim().to_lowercase();
                let swarm = r.swarm.unwrap_or_default();
                DownloadCandidate {
                    source_locator: self.magnet.build(&hash, ctx.display_title.trim()),
                    identity_hash: hash,
                    source: SourceId::Solidtorrents,
                    quality: parsed.quality,
                    encoding_tag: parsed.encoding_tag,
                    seeders: swarm.seeders,
                    leechers: swarm.leechers,
                    size_label: format_gb(r.size),
                    uploaded_label: UPLOADED_LABEL.to_string(),
                    title: r.title,
                }
            })
            .collect())
    }
}

#[async_trait]
impl Source for SolidtorrentsSource {
    fn id(&self) -> SourceId {
        SourceId::Solidtorrents
    }

    fn limit(&self) -> u32 {
        self.settings.limit
    }

    async fn search(&self, ctx: &QueryContext) -> Result<Vec<DownloadCandidate>, SourceError> {
        let url = self.build_search_url(ctx);
        let body = self.transport.get_text(&url).await?;
        let candidates = self.parse_response(&body, ctx)?;
        debug!(source = "solidtorrents", results = candidates.len(), "Search complete");
        Ok(candidates)
    }
}

#[derive(Debug, Deserialize)]
struct SolidResponse {
    success: Option<bool>,
    results: Option<Vec<SolidResult>>,
}

#[derive(Debug, Deserialize)]
struct SolidResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    infohash: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    size: u64,
    swarm: Option<SolidSwarm>,
}

#[derive(Debug, Default, Deserialize)]
struct SolidSwarm {
    #[serde(default, deserialize_with = "lenient_u32")]
    seeders: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    leechers: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::searcher::Quality;
    use crate::testing::MockTransport;

    const HEAT: &str = r#"{
        "success": true,
        "hits": {"value": 3},
        "results": [
            {"_id": "a1", "title": "Heat 1995 1080p BluRay x265", "infohash": "HHHH0001",
             "size": 3221225472, "swarm": {"seeders": 55, "leechers": 6, "verified": true}},
            {"_id": "a2", "title": "Heat 1995 DVDRip", "infohash": "hhhh0002",
             "size": 805306368},
            {"_id": "a3", "title": "Heat broken", "size": 1, "swarm": {"seeders": 9, "leechers": 0}}
        ]
    }"#;

    fn heat() -> QueryContext {
        QueryContext::movie(" Heat (1995) ")
    }

    fn source(limit: u32) -> SolidtorrentsSource {
        SolidtorrentsSource::new(
            SourceSettings {
                base_url: "https://solid.test/api/v1".to_string(),
                limit,
            },
            Arc::new(MockTransport::new()),
            MagnetBuilder::default(),
        )
    }

    #[test]
    fn test_build_url() {
        let ctx = QueryContext::movie("Heat");
        assert_eq!(
            source(8).build_search_url(&ctx),
            "https://solid.test/api/v1/search?q=Heat&category=Video&sort=seeders"
        );
    }

    #[test]
    fn test_parse_nested_swarm() {
        let candidates = source(8).parse_response(HEAT, &heat()).unwrap();

        assert_eq!(candidates.len(), 2);
        let first = &candidates[0];
        assert_eq!(first.identity_hash, "hhhh0001");
        assert_eq!(first.source, SourceId::Solidtorrents);
        assert_eq!(first.quality, Quality::P1080);
        assert_eq!(first.encoding_tag, "BLURAY (HEVC)");
        assert_eq!(first.seeders, 55);
        assert_eq!(first.leechers, 6);
        assert_eq!(first.size_label, "3.00 GB");
        assert_eq!(first.uploaded_label, "Recent");
        assert_eq!(first.title, "Heat 1995 1080p BluRay x265");
        assert_eq!(
            first.source_locator,
            "magnet:?xt=urn:btih:hhhh0001&dn=Heat%20%281995%29"
        );
    }

    #[test]
    fn test_parse_missing_swarm_is_zero() {
        let candidates = source(8).parse_response(HEAT, &heat()).unwrap();
        let second = &candidates[1];

        assert_eq!(second.seeders, 0);
        assert_eq!(second.leechers, 0);
        assert_eq!(second.quality, Quality::Unknown);
        assert_eq!(second.encoding_tag, "DVDRIP");
        assert_eq!(second.size_label, "0.75 GB");
    }

    #[test]
    fn test_parse_caps_results() {
        assert_eq!(source(1).parse_response(HEAT, &heat()).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_unsuccessful() {
        let result = source(8).parse_response(r#"{"success": false}"#, &heat());
        assert!(matches!(result, Err(SourceError::ApiError(_))));
    }

    #[test]
    fn test_parse_no_results() {
        let body = r#"{"success": true, "results": []}"#;
        assert!(source(8).parse_response(body, &heat()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_propagates_transport_failure() {
        let transport = Arc::new(MockTransport::new());
        transport.fail_status("search", 503).await;
        let source = SolidtorrentsSource::new(
            SourceSettings {
                base_url: "https://solid.test/api/v1".to_string(),
                limit: 8,
            },
            transport,
            MagnetBuilder::default(),
        );

        let result = source.search(&QueryContext::movie("Heat")).await;
        assert!(matches!(result, Err(SourceError::HttpStatus { status: 503, .. })));
    }
}
