//! General swarm search (apibay-style `q.php`).
//!
//! Rows carry every value as a string. An empty result is a single sentinel
//! row with id `0` rather than an empty array.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{format_gb_or_mb, lenient_id, lenient_u32, lenient_u64, SourceSettings};
use crate::searcher::title_parser::parse_title;
use crate::searcher::{
    DownloadCandidate, MagnetBuilder, QueryContext, Source, SourceError, SourceId, Transport,
};

/// Video category.
const VIDEO_CATEGORY: u32 = 200;

/// The index reports no usable upload date.
const UPLOADED_LABEL: &str = "Recent";

/// Hash carried by the "no results" sentinel row.
const EMPTY_HASH: &str = "0000000000000000000000000000000000000000";

pub struct ApibaySource {
    settings: SourceSettings,
    transport: Arc<dyn Transport>,
    magnet: MagnetBuilder,
}

impl ApibaySource {
    pub fn new(settings: SourceSettings, transport: Arc<dyn Transport>, magnet: MagnetBuilder) -> Self {
        Self {
            settings,
            transport,
            magnet,
        }
    }

    fn build_search_url(&self, ctx: &QueryContext) -> String {
        format!(
            "{}?q={}&cat={}",
            self.settings.endpoint("q.php"),
            urlencoding::encode(ctx.display_title.trim()),
            VIDEO_CATEGORY
        )
    }

    fn parse_response(
        &self,
        body: &str,
        ctx: &QueryContext,
    ) -> Result<Vec<DownloadCandidate>, SourceError> {
        let rows: Vec<ApibayRow> = serde_json::from_str(body)?;

        if rows.first().map_or(true, ApibayRow::is_sentinel) {
            return Ok(Vec::new());
        }

        Ok(rows
            .into_iter()
            .filter(|row| !row.is_sentinel() && !row.info_hash.trim().is_empty())
            .take(self.settings.limit as usize)
            .map(|row| {
                let parsed = parse_title(&row.name);
                let hash = row.info_hash.trim().to_lowercase();
                DownloadCandidate {
                    source_locator: self.magnet.build(&hash, ctx.display_title.trim()),
                    identity_hash: hash,
                    source: SourceId::Apibay,
                    quality: parsed.quality,
                    encoding_tag: parsed.encoding_tag,
                    seeders: row.seeders,
                    leechers: row.leechers,
                    size_label: format_gb_or_mb(row.size),
                    uploaded_label: UPLOADED_LABEL.to_string(),
                    title: row.name,
                }
            })
            .collect())
    }
}

#[async_trait]
impl Source for ApibaySource {
    fn id(&self) -> SourceId {
        SourceId::Apibay
    }

    fn limit(&self) -> u32 {
        self.settings.limit
    }

    async fn search(&self, ctx: &QueryContext) -> Result<Vec<DownloadCandidate>, SourceError> {
        let url = self.build_search_url(ctx);
        let body = self.transport.get_text(&url).await?;
        let candidates = self.parse_response(&body, ctx)?;
        debug!(source = "apibay", results = candidates.len(), "Search complete");
        Ok(candidates)
    }
}

#[derive(Debug, Deserialize)]
struct ApibayRow {
    #[serde(default, deserialize_with = "lenient_id")]
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    info_hash: String,
    #[serde(default, deserialize_with = "lenient_u32")]
    seeders: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    leechers: u32,
    #[serde(default, deserialize_with = "lenient_u64")]
    size: u64,
}

impl ApibayRow {
    fn is_sentinel(&self) -> bool {
        self.id.as_deref() == Some("0") || self.info_hash == EMPTY_HASH
    }
}
