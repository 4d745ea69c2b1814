//! Movie catalog adapter (YTS-style API).
//!
//! The catalog reports quality and release type per torrent, so no title
//! parsing is needed.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{lenient_u32, SourceSettings};
use crate::searcher::title_parser::codec_suffix;
use crate::searcher::{
    DownloadCandidate, MagnetBuilder, Quality, QueryContext, Source, SourceError, SourceId,
    Transport,
};

/// An identifier lookup names exactly one work.
const PRECISE_LOOKUP_LIMIT: u32 = 1;

pub struct YtsSource {
    settings: SourceSettings,
    transport: Arc<dyn Transport>,
    magnet: MagnetBuilder,
}

impl YtsSource {
    pub fn new(settings: SourceSettings, transport: Arc<dyn Transport>, magnet: MagnetBuilder) -> Self {
        Self {
            settings,
            transport,
            magnet,
        }
    }

    /// By external id when known (one work), by title otherwise.
    fn build_search_url(&self, ctx: &QueryContext) -> String {
        let (term, limit) = match ctx.external_id() {
            Some(id) => (id, PRECISE_LOOKUP_LIMIT),
            None => (ctx.display_title.trim(), self.settings.limit),
        };
        format!(
            "{}?query_term={}&limit={}",
            self.settings.endpoint("list_movies.json"),
            urlencoding::encode(term),
            limit
        )
    }

    /// Torrents of the first matching work.
    fn parse_response(
        &self,
        body: &str,
        ctx: &QueryContext,
    ) -> Result<Vec<DownloadCandidate>, SourceError> {
        let response: YtsResponse = serde_json::from_str(body)?;

        if response.status != "ok" {
            return Err(SourceError::ApiError(
                response.status_message.unwrap_or(response.status),
            ));
        }

        let Some(movie) = response
            .data
            .and_then(|d| d.movies)
            .and_then(|movies| movies.into_iter().next())
        else {
            return Ok(Vec::new());
        };

        let name = movie.title_long.unwrap_or(movie.title);

        Ok(movie
            .torrents
            .unwrap_or_default()
            .into_iter()
            .filter(|t| !t.hash.trim().is_empty())
            .take(self.settings.limit as usize)
            .map(|t| {
                let hash = t.hash.trim().to_lowercase();
                let release_type = t.torrent_type.as_deref().unwrap_or("web");
                let title = format!("{} {} {}", name, t.quality, release_type);
                DownloadCandidate {
                    source_locator: self.magnet.build(&hash, ctx.display_title.trim()),
                    identity_hash: hash,
                    title,
                    source: SourceId::Yts,
                    quality: Quality::from_label(&t.quality),
                    encoding_tag: format!(
                        "{}{}",
                        release_type.to_uppercase(),
                        codec_suffix(t.video_codec.as_deref().unwrap_or(""))
                    ),
                    seeders: t.seeds,
                    leechers: t.peers,
                    size_label: t.size.unwrap_or_default(),
                    uploaded_label: t
                        .date_uploaded
                        .as_deref()
                        .and_then(|d| d.split_whitespace().next())
                        .unwrap_or("Unknown")
                        .to_string(),
                }
            })
            .collect())
    }
}

#[async_trait]
impl Source for YtsSource {
    fn id(&self) -> SourceId {
        SourceId::Yts
    }

    fn limit(&self) -> u32 {
        self.settings.limit
    }

    async fn search(&self, ctx: &QueryContext) -> Result<Vec<DownloadCandidate>, SourceError> {
        let url = self.build_search_url(ctx);
        let body = self.transport.get_text(&url).await?;
        let candidates = self.parse_response(&body, ctx)?;
        debug!(source = "yts", results = candidates.len(), "Search complete");
        Ok(candidates)
    }
}

#[derive(Debug, Deserialize)]
struct YtsResponse {
    status: String,
    status_message: Option<String>,
    data: Option<YtsData>,
}

#[derive(Debug, Deserialize)]
struct YtsData {
    movies: Option<Vec<YtsMovie>>,
}

#[derive(Debug, Deserialize)]
struct YtsMovie {
    title: String,
    title_long: Option<String>,
    torrents: Option<Vec<YtsTorrent>>,
}

#[derive(Debug, Deserialize)]
struct YtsTorrent {
    #[serde(default)]
    hash: String,
    #[serde(default)]
    quality: String,
    #[serde(rename = "type")]
    torrent_type: Option<String>,
    video_codec: Option<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    seeds: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    peers: u32,
    size: Option<String>,
    date_uploaded: Option<String>,
}
