//! Types for the download aggregation system.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Kind of title being looked up.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Movie,
    Series,
}

/// Input to one aggregation request.
///
/// Built once per call by the metadata layer and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryContext {
    /// Title as displayed to the user, used as the free-text query.
    pub display_title: String,
    pub media_kind: MediaKind,
    /// Cross-catalog identifier such as `tt0903747`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode: Option<u32>,
}

impl QueryContext {
    pub fn movie(display_title: impl Into<String>) -> Self {
        Self {
            display_title: display_title.into(),
            media_kind: MediaKind::Movie,
            external_id: None,
            season: None,
            episode: None,
        }
    }

    pub fn series(display_title: impl Into<String>) -> Self {
        Self {
            media_kind: MediaKind::Series,
            ..Self::movie(display_title)
        }
    }

    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    pub fn with_episode(mut self, season: u32, episode: u32) -> Self {
        self.season = Some(season);
        self.episode = Some(episode);
        self
    }

    /// True when the title carries nothing to search for.
    pub fn is_blank(&self) -> bool {
        self.display_title.trim().is_empty()
    }

    /// The external identifier, if present and not blank.
    pub fn external_id(&self) -> Option<&str> {
        self.external_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Check the structural contract of the context.
    ///
    /// A blank title is not a contract violation; the aggregator answers it
    /// with an empty result.
    pub fn validate(&self) -> Result<(), QueryError> {
        if self.media_kind == MediaKind::Movie && (self.season.is_some() || self.episode.is_some())
        {
            return Err(QueryError::EpisodeOnMovie);
        }
        if self.season == Some(0) {
            return Err(QueryError::InvalidSeason);
        }
        if self.episode == Some(0) {
            return Err(QueryError::InvalidEpisode);
        }
        if self.episode.is_some() && self.season.is_none() {
            return Err(QueryError::EpisodeWithoutSeason);
        }
        Ok(())
    }
}

/// Quality tier derived from a release name or reported by a source.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Quality {
    #[serde(rename = "2160P")]
    P2160,
    #[serde(rename = "4K")]
    K4,
    #[serde(rename = "1080P")]
    P1080,
    #[serde(rename = "720P")]
    P720,
    #[serde(rename = "480P")]
    P480,
    /// Display label for sources that cannot tell; stands in for `Unknown`.
    #[serde(rename = "HD")]
    Hd,
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl Quality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::P2160 => "2160P",
            Quality::K4 => "4K",
            Quality::P1080 => "1080P",
            Quality::P720 => "720P",
            Quality::P480 => "480P",
            Quality::Hd => "HD",
            Quality::Unknown => "UNKNOWN",
        }
    }

    /// Parse a quality label case-insensitively ("1080p", "4K", ...).
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "2160p" => Quality::P2160,
            "4k" => Quality::K4,
            "1080p" => Quality::P1080,
            "720p" => Quality::P720,
            "480p" => Quality::P480,
            "hd" => Quality::Hd,
            _ => Quality::Unknown,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies one of the indexer adapters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SourceId {
    /// Movie catalog with structured per-quality torrents.
    Yts,
    /// Per-episode TV catalog keyed by external identifier.
    Eztv,
    /// General swarm search.
    Apibay,
    /// Second general swarm search with nested swarm counts.
    Solidtorrents,
}

impl SourceId {
    pub const ALL: [SourceId; 4] = [
        SourceId::Yts,
        SourceId::Eztv,
        SourceId::Apibay,
        SourceId::Solidtorrents,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::Yts => "yts",
            SourceId::Eztv => "eztv",
            SourceId::Apibay => "apibay",
            SourceId::Solidtorrents => "solidtorrents",
        }
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single discoverable download option, normalized across sources.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DownloadCandidate {
    /// Info hash (lowercase hex), used for deduplication.
    pub identity_hash: String,
    /// Magnet locator for this swarm.
    pub source_locator: String,
    /// Release name as reported by the source.
    pub title: String,
    /// Adapter that produced this candidate.
    pub source: SourceId,
    pub quality: Quality,
    /// Container/codec description, e.g. "BLURAY (HEVC)".
    pub encoding_tag: String,
    pub seeders: u32,
    pub leechers: u32,
    pub size_label: String,
    pub uploaded_label: String,
}

/// Outcome of one aggregation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Deduplicated, live, ranked candidates.
    pub candidates: Vec<DownloadCandidate>,
    /// Sources that were invoked for this query, in invocation order.
    pub sources_queried: Vec<SourceId>,
    /// Sources that contributed nothing because they failed (id -> error message).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub source_errors: BTreeMap<SourceId, String>,
    pub duration_ms: u64,
}

/// Errors a single source can run into. Never escapes the aggregator.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Source connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timeout")]
    Timeout,

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Source API error: {0}")]
    ApiError(String),

    #[error("Request cancelled")]
    Cancelled,

    #[error("Source not configured: {0}")]
    NotConfigured(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SourceError::Timeout
        } else if e.is_connect() {
            SourceError::ConnectionFailed(e.to_string())
        } else if e.is_decode() {
            SourceError::ParseError(e.to_string())
        } else {
            SourceError::ConnectionFailed(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(e: serde_json::Error) -> Self {
        SourceError::ParseError(e.to_string())
    }
}

/// Caller passed a structurally invalid [`QueryContext`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("season must be a positive integer")]
    InvalidSeason,

    #[error("episode must be a positive integer")]
    InvalidEpisode,

    #[error("episode given without a season")]
    EpisodeWithoutSeason,

    #[error("season/episode are only meaningful for series")]
    EpisodeOnMovie,
}

/// One indexer adapter.
#[async_trait]
pub trait Source: Send + Sync {
    fn id(&self) -> SourceId;

    /// Maximum entries consumed from the indexer per query.
    fn limit(&self) -> u32;

    /// Query the indexer and normalize its response.
    ///
    /// An error here is recorded against this source by the aggregator and
    /// contributes no candidates. It never fails the whole query.
    async fn search(&self, ctx: &QueryContext) -> Result<Vec<DownloadCandidate>, SourceError>;
}
