//! Mock source for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::searcher::{DownloadCandidate, QueryContext, Source, SourceError, SourceId};

/// A recorded query for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedQuery {
    pub ctx: QueryContext,
    pub timestamp: Instant,
}

/// Mock implementation of the [`Source`] trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable candidates
/// - Track queries for assertions
/// - Simulate failures and slow indexers
///
/// # Example
///
/// ```rust,ignore
/// use seedscout_core::testing::{fixtures, MockSource};
///
/// let source = MockSource::with_results(SourceId::Apibay, vec![
///     fixtures::candidate("abc123", 50, SourceId::Apibay),
/// ]);
/// source.set_next_error(SourceError::Timeout).await;
/// ```
pub struct MockSource {
    id: SourceId,
    limit: u32,
    /// Configured results to return.
    results: Arc<RwLock<Vec<DownloadCandidate>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedQuery>>>,
    /// If set, the next search will fail with this error.
    next_error: Arc<RwLock<Option<SourceError>>>,
    /// If set, every search fails with a connection error carrying this message.
    failure: Arc<RwLock<Option<String>>>,
    /// Simulated response latency.
    delay: Arc<RwLock<Option<Duration>>>,
}

impl std::fmt::Debug for MockSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSource")
            .field("id", &self.id)
            .field("limit", &self.limit)
            .field("results", &"<results>")
            .field("queries", &"<queries>")
            .finish()
    }
}

impl MockSource {
    /// Create a mock source with no results.
    pub fn new(id: SourceId) -> Self {
        Self::with_results(id, Vec::new())
    }

    /// Create a mock source with predefined results.
    pub fn with_results(id: SourceId, results: Vec<DownloadCandidate>) -> Self {
        Self {
            id,
            limit: 10,
            results: Arc::new(RwLock::new(results)),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            failure: Arc::new(RwLock::new(None)),
            delay: Arc::new(RwLock::new(None)),
        }
    }

    /// Create a mock source whose every search fails.
    pub fn failing(id: SourceId, message: &str) -> Self {
        let mut source = Self::new(id);
        source.failure = Arc::new(RwLock::new(Some(message.to_string())));
        source
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Set the results to return for subsequent searches.
    pub async fn set_results(&self, results: Vec<DownloadCandidate>) {
        *self.results.write().await = results;
    }

    /// Configure the next search to fail with the given error.
    pub async fn set_next_error(&self, error: SourceError) {
        *self.next_error.write().await = Some(error);
    }

    /// Delay every search by `delay` before answering.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// Get recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedQuery> {
        self.queries.read().await.clone()
    }

    /// Get the number of searches performed.
    pub async fn search_count(&self) -> usize {
        self.queries.read().await.len()
    }
}

#[async_trait]
impl Source for MockSource {
    fn id(&self) -> SourceId {
        self.id
    }

    fn limit(&self) -> u32 {
        self.limit
    }

    async fn search(&self, ctx: &QueryContext) -> Result<Vec<DownloadCandidate>, SourceError> {
        self.queries.write().await.push(RecordedQuery {
            ctx: ctx.clone(),
            timestamp: Instant::now(),
        });

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }
        if let Some(message) = self.failure.read().await.clone() {
            return Err(SourceError::ConnectionFailed(message));
        }

        Ok(self.results.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[tokio::test]
    async fn test_mock_source_records_queries() {
        let source = MockSource::with_results(
            SourceId::Apibay,
            vec![fixtures::candidate("abc", 5, SourceId::Apibay)],
        );

        let results = source.search(&QueryContext::movie("Heat")).await.unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(source.search_count().await, 1);
        assert_eq!(source.recorded_queries().await[0].ctx.display_title, "Heat");
    }

    #[tokio::test]
    async fn test_mock_source_next_error_is_one_shot() {
        let source = MockSource::new(SourceId::Yts);
        source.set_next_error(SourceError::Timeout).await;

        let ctx = QueryContext::movie("Heat");
        assert!(matches!(source.search(&ctx).await, Err(SourceError::Timeout)));
        assert!(source.search(&ctx).await.is_ok());
    }

    #[tokio::test]
    async fn test_mock_source_failing() {
        let source = MockSource::failing(SourceId::Eztv, "down");
        let ctx = QueryContext::movie("Heat");
        assert!(source.search(&ctx).await.is_err());
        assert!(source.search(&ctx).await.is_err());
    }
}
