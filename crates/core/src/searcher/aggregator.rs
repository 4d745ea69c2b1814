//! Fan-out aggregation across every eligible source.

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::config::Config;
use crate::metrics::{CANDIDATES_RETURNED, SOURCE_DURATION, SOURCE_REQUESTS};

use super::dedup::rank_candidates;
use super::planner::is_eligible;
use super::settle::{settle_all, Settled};
use super::sources::create_sources;
use super::transport::create_transport;
use super::{AggregateResult, MagnetBuilder, QueryContext, QueryError, Source, SourceError};

/// Queries registered sources concurrently and merges their answers.
pub struct Aggregator {
    sources: Vec<Arc<dyn Source>>,
}

impl Aggregator {
    pub fn new(sources: Vec<Arc<dyn Source>>) -> Self {
        Self { sources }
    }

    /// Build the transport and every enabled adapter from configuration.
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        let transport = create_transport(&config.transport)?;
        let magnet = MagnetBuilder::from_config(&config.magnet);
        Ok(Self::new(create_sources(&config.sources, transport, magnet)))
    }

    /// Registered sources in invocation order.
    pub fn sources(&self) -> &[Arc<dyn Source>] {
        &self.sources
    }

    /// Run one aggregation.
    ///
    /// Source failures end up in [`AggregateResult::source_errors`]; only a
    /// malformed context is an error. Cancelling `cancel` settles whatever is
    /// still outstanding as cancelled and returns what already arrived.
    pub async fn aggregate(
        &self,
        ctx: &QueryContext,
        cancel: &CancellationToken,
    ) -> Result<AggregateResult, QueryError> {
        ctx.validate()?;

        if ctx.is_blank() {
            return Ok(AggregateResult::default());
        }

        let start = Instant::now();
        let selected: Vec<&Arc<dyn Source>> = self
            .sources
            .iter()
            .filter(|s| is_eligible(s.id(), ctx))
            .collect();

        let tasks = selected.iter().map(|source| async move {
            let id = source.id();
            let timer = SOURCE_DURATION.with_label_values(&[id.as_str()]).start_timer();
            let result = source.search(ctx).await;
            timer.observe_duration();
            result
        });
        let settled = settle_all(tasks, cancel).await;

        let mut result = AggregateResult {
            sources_queried: selected.iter().map(|s| s.id()).collect(),
            ..Default::default()
        };
        let mut merged = Vec::new();

        for (source, outcome) in selected.iter().zip(settled) {
            let id = source.id();
            match outcome {
                Settled::Fulfilled(candidates) => {
                    SOURCE_REQUESTS.with_label_values(&[id.as_str(), "success"]).inc();
                    merged.extend(candidates);
                }
                Settled::Rejected(e) => {
                    SOURCE_REQUESTS.with_label_values(&[id.as_str(), "error"]).inc();
                    warn!(source = %id, error = %e, "Source search failed");
                    result.source_errors.insert(id, e.to_string());
                }
                Settled::Cancelled => {
                    SOURCE_REQUESTS.with_label_values(&[id.as_str(), "cancelled"]).inc();
                    warn!(source = %id, "Source search cancelled");
                    result.source_errors.insert(id, SourceError::Cancelled.to_string());
                }
            }
        }

        let raw_count = merged.len();
        result.candidates = rank_candidates(merged);
        result.duration_ms = start.elapsed().as_millis() as u64;
        CANDIDATES_RETURNED
            .with_label_values(&[])
            .observe(result.candidates.len() as f64);

        info!(
            title = %ctx.display_title,
            sources = result.sources_queried.len(),
            failed = result.source_errors.len(),
            raw = raw_count,
            returned = result.candidates.len(),
            duration_ms = result.duration_ms,
            "Aggregation complete"
        );

        Ok(result)
    }
}
