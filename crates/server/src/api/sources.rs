//! Registered source listing.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use seedscout_core::{searcher::describe, SourceId};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SourceInfo {
    pub id: SourceId,
    pub limit: u32,
    pub capability: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SourcesResponse {
    pub sources: Vec<SourceInfo>,
}

/// GET /api/v1/sources
pub async fn list_sources(State(state): State<Arc<AppState>>) -> Json<SourcesResponse> {
    let sources = state
        .aggregator()
        .sources()
        .iter()
        .map(|s| SourceInfo {
            id: s.id(),
            limit: s.limit(),
            capability: describe(s.id()),
        })
        .collect();

    Json(SourcesResponse { sources })
}
