//! Download discovery API handler.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use seedscout_core::{AggregateResult, DownloadCandidate, QueryContext, SourceId};
use tracing::debug;

use super::handlers::ErrorResponse;
use crate::state::AppState;

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct DownloadsParams {
    /// Show at most this many of the ranked candidates.
    #[serde(default)]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct DownloadsResponse {
    pub candidates: Vec<DownloadCandidate>,
    /// Candidates before `limit` was applied.
    pub total: usize,
    pub sources_queried: Vec<SourceId>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub source_errors: BTreeMap<SourceId, String>,
    pub duration_ms: u64,
}

impl DownloadsResponse {
    fn new(result: AggregateResult, limit: Option<usize>) -> Self {
        let total = result.candidates.len();
        let mut candidates = result.candidates;
        if let Some(limit) = limit {
            candidates.truncate(limit);
        }
        Self {
            candidates,
            total,
            sources_queried: result.sources_queried,
            source_errors: result.source_errors,
            duration_ms: result.duration_ms,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/downloads
///
/// Find download candidates for a title across every eligible source.
/// The request is cancelled when the client goes away or the server shuts
/// down.
pub async fn find_downloads(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DownloadsParams>,
    Json(ctx): Json<QueryContext>,
) -> Result<Json<DownloadsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let cancel = state.shutdown_token().child_token();
    let _guard = cancel.clone().drop_guard();

    debug!(title = %ctx.display_title, kind = ?ctx.media_kind, "Finding downloads");

    match state.aggregator().aggregate(&ctx, &cancel).await {
        Ok(result) => Ok(Json(DownloadsResponse::new(result, params.limit))),
        Err(e) => Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )),
    }
}
