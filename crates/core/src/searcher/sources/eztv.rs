//! Per-episode TV catalog adapter (EZTV-style API).
//!
//! Looked up by the numeric part of the external identifier. The catalog
//! returns whole-show pages, so entries are narrowed to the requested episode
//! afterwards.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::Deserialize;
use tracing::debug;

use super::{format_mb, lenient_u32, lenient_u64, SourceSettings};
use crate::searcher::title_parser::parse_title;
use crate::searcher::{
    DownloadCandidate, MagnetBuilder, Quality, QueryContext, Source, SourceError, SourceId,
    Transport,
};

static EPISODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)S\d{2}E\d{2}").unwrap());

pub struct EztvSource {
    settings: SourceSettings,
    transport: Arc<dyn Transport>,
    magnet: MagnetBuilder,
}

impl EztvSource {
    pub fn new(settings: SourceSettings, transport: Arc<dyn Transport>, magnet: MagnetBuilder) -> Self {
        Self {
            settings,
            transport,
            magnet,
        }
    }

    fn build_search_url(&self, numeric_id: &str) -> String {
        format!(
            "{}?imdb_id={}&limit={}&page=1",
            self.settings.endpoint("get-torrents"),
            numeric_id,
            self.settings.limit
        )
    }

    fn parse_response(
        &self,
        body: &str,
        ctx: &QueryContext,
    ) -> Result<Vec<DownloadCandidate>, SourceError> {
        let response: EztvResponse = serde_json::from_str(body)?;
        let wanted = episode_marker(ctx);

        Ok(response
            .torrents
            .unwrap_or_default()
            .into_iter()
            .take(self.settings.limit as usize)
            .filter(|t| !t.hash.trim().is_empty())
            .filter(|t| match &wanted {
                Some(marker) => t.title.to_uppercase().contains(marker.as_str()),
                None => true,
            })
            .map(|t| self.to_candidate(t, ctx))
            .collect())
    }

    fn to_candidate(&self, t: EztvTorrent, ctx: &QueryContext) -> DownloadCandidate {
        let parsed = parse_title(&t.title);
        let hash = t.hash.trim().to_lowercase();
        let source_locator = match t.magnet_url.as_deref() {
            Some(m) if m.starts_with("magnet:") => m.to_string(),
            _ => self.magnet.build(&hash, ctx.display_title.trim()),
        };

        DownloadCandidate {
            identity_hash: hash,
            source_locator,
            source: SourceId::Eztv,
            quality: match parsed.quality {
                Quality::Unknown => Quality::Hd,
                q => q,
            },
            encoding_tag: parsed.encoding_tag,
            seeders: t.seeds,
            leechers: t.peers,
            size_label: format_mb(t.size_bytes),
            uploaded_label: format_release_date(t.date_released_unix),
            title: t.title,
        }
    }
}

#[async_trait]
impl Source for EztvSource {
    fn id(&self) -> SourceId {
        SourceId::Eztv
    }

    fn limit(&self) -> u32 {
        self.settings.limit
    }

    async fn search(&self, ctx: &QueryContext) -> Result<Vec<DownloadCandidate>, SourceError> {
        let external_id = ctx
            .external_id()
            .ok_or_else(|| SourceError::NotConfigured("external id required".to_string()))?;
        let numeric_id = numeric_id(external_id).ok_or_else(|| {
            SourceError::ParseError(format!("external id {:?} has no numeric part", external_id))
        })?;

        let url = self.build_search_url(numeric_id);
        let body = self.transport.get_text(&url).await?;
        let candidates = self.parse_response(&body, ctx)?;
        debug!(source = "eztv", results = candidates.len(), "Search complete");
        Ok(candidates)
    }
}

/// `tt0903747` -> `0903747`. `None` unless what remains is all digits.
fn numeric_id(external_id: &str) -> Option<&str> {
    let digits = external_id.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    (!digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())).then_some(digits)
}

/// Upper-cased `SxxEyy` the entries must carry, from the title or the context.
fn episode_marker(ctx: &QueryContext) -> Option<String> {
    EPISODE_RE
        .find(&ctx.display_title)
        .map(|m| m.as_str().to_uppercase())
        .or_else(|| match (ctx.season, ctx.episode) {
            (Some(season), Some(episode)) => Some(format!("S{:02}E{:02}", season, episode)),
            _ => None,
        })
}

/// Unix seconds -> `YYYY-MM-DD` (UTC).
fn format_release_date(unix_secs: u64) -> String {
    i64::try_from(unix_secs)
        .ok()
        .filter(|secs| *secs > 0)
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

#[derive(Debug, Deserialize)]
struct EztvResponse {
    torrents: Option<Vec<EztvTorrent>>,
}

#[derive(Debug, Deserialize)]
struct EztvTorrent {
    #[serde(default)]
    hash: String,
    #[serde(default)]
    title: String,
    magnet_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    seeds: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    peers: u32,
    #[serde(default, deserialize_with = "lenient_u64")]
    size_bytes: u64,
    #[serde(default, deserialize_with = "lenient_u64")]
    date_released_unix: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;

    const SHOW_PAGE: &str = r#"{
        "imdb_id": "0903747",
        "torrents_count": 3,
        "limit": 10,
        "page": 1,
        "torrents": [
            {"id": 1, "hash": "E1E1E1", "title": "Show.S01E02.HDTV",
             "magnet_url": "magnet:?xt=urn:btih:E1E1E1&dn=Show.S01E02.HDTV",
             "seeds": 30, "peers": 2, "size_bytes": "367001600", "date_released_unix": 1700000000},
            {"id": 2, "hash": "E2E2E2", "title": "Show.S02E02.HDTV",
             "seeds": 12, "peers": 1, "size_bytes": "1000", "date_released_unix": 1700000000},
            {"id": 3, "hash": "E3E3E3", "title": "Show.s01e02.1080p.WEB-DL.x265",
             "seeds": "8", "peers": "0", "size_bytes": 2147483648, "date_released_unix": "1600000000"}
        ]
    }"#;

    fn source(limit: u32) -> EztvSource {
        EztvSource::new(
            SourceSettings {
                base_url: "https://eztv.test/api".to_string(),
                limit,
            },
            Arc::new(MockTransport::new()),
            MagnetBuilder::default(),
        )
    }

    #[test]
    fn test_numeric_id() {
        assert_eq!(numeric_id("tt0903747"), Some("0903747"));
        assert_eq!(numeric_id("0903747"), Some("0903747"));
        assert_eq!(numeric_id("tt"), None);
        assert_eq!(numeric_id("tt12ab"), None);
    }

    #[test]
    fn test_build_url() {
        assert_eq!(
            source(10).build_search_url("0903747"),
            "https://eztv.test/api/get-torrents?imdb_id=0903747&limit=10&page=1"
        );
    }

    #[test]
    fn test_episode_filter_from_title() {
        let ctx = QueryContext::series("Show S01E02").with_external_id("tt0903747");
        let candidates = source(10).parse_response(SHOW_PAGE, &ctx).unwrap();

        let titles: Vec<&str> = candidates.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Show.S01E02.HDTV", "Show.s01e02.1080p.WEB-DL.x265"]);
    }

    #[test]
    fn test_episode_filter_from_context_numbers() {
        let ctx = QueryContext::series("Show")
            .with_external_id("tt0903747")
            .with_episode(2, 2);
        let candidates = source(10).parse_response(SHOW_PAGE, &ctx).unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "Show.S02E02.HDTV");
    }

    #[test]
    fn test_no_episode_marker_keeps_everything() {
        let ctx = QueryContext::series("Show").with_external_id("tt0903747");
        let candidates = source(10).parse_response(SHOW_PAGE, &ctx).unwrap();
        assert_eq!(candidates.len(), 3);
    }

    #[test]
    fn test_limit_applies_before_filter() {
        let ctx = QueryContext::series("Show S01E02").with_external_id("tt0903747");
        let candidates = source(2).parse_response(SHOW_PAGE, &ctx).unwrap();
        // third entry matches but lies beyond the consumed page
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn test_unknown_quality_shown_as_hd() {
        let ctx = QueryContext::series("Show S01E02").with_external_id("tt0903747");
        let candidates = source(10).parse_response(SHOW_PAGE, &ctx).unwrap();

        assert_eq!(candidates[0].quality, Quality::Hd);
        assert_eq!(candidates[0].encoding_tag, "WEBRIP");
        assert_eq!(candidates[1].quality, Quality::P1080);
        assert_eq!(candidates[1].encoding_tag, "WEB-DL (HEVC)");
    }

    #[test]
    fn test_size_date_and_locator() {
        let ctx = QueryContext::series("Show S01E02").with_external_id("tt0903747");
        let candidates = source(10).parse_response(SHOW_PAGE, &ctx).unwrap();
        let first = &candidates[0];

        assert_eq!(first.identity_hash, "e1e1e1");
        assert_eq!(first.size_label, "350.0 MB");
        assert_eq!(first.uploaded_label, "2023-11-14");
        assert_eq!(first.source_locator, "magnet:?xt=urn:btih:E1E1E1&dn=Show.S01E02.HDTV");
        assert_eq!(first.seeders, 30);

        let second = &candidates[1];
        assert_eq!(second.size_label, "2048.0 MB");
        assert_eq!(second.uploaded_label, "2020-09-13");
        assert_eq!(
            second.source_locator,
            "magnet:?xt=urn:btih:e3e3e3&dn=Show%20S01E02"
        );
    }

    #[test]
    fn test_format_release_date_invalid() {
        assert_eq!(format_release_date(0), "Unknown");
        assert_eq!(format_release_date(u64::MAX), "Unknown");
    }

    #[test]
    fn test_parse_no_torrents() {
        let ctx = QueryContext::series("Show").with_external_id("tt1");
        let body = r#"{"imdb_id": "1", "torrents_count": 0, "limit": 10, "page": 1}"#;
        assert!(source(10).parse_response(body, &ctx).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_requires_numeric_id() {
        let ctx = QueryContext::series("Show").with_external_id("tt");
        let result = source(10).search(&ctx).await;
        assert!(matches!(result, Err(SourceError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_search_strips_id_prefix() {
        let transport = Arc::new(MockTransport::new());
        transport.respond("get-torrents", SHOW_PAGE).await;
        let source = EztvSource::new(
            SourceSettings {
                base_url: "https://eztv.test/api".to_string(),
                limit: 10,
            },
            transport.clone(),
            MagnetBuilder::default(),
        );

        let ctx = QueryContext::series("Show S01E02").with_external_id("tt0903747");
        let candidates = source.search(&ctx).await.unwrap();

        assert_eq!(candidates.len(), 2);
        assert!(transport.requested_urls().await[0].contains("imdb_id=0903747&"));
    }
}
