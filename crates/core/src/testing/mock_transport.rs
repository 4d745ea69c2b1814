//! Mock transport for testing adapters without a network.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::searcher::{SourceError, Transport};

#[derive(Debug, Clone)]
enum Reply {
    Body(String),
    Status(u16),
    Unreachable,
}

/// Mock implementation of the [`Transport`] trait.
///
/// Replies are matched by URL substring, first registered match wins. A URL
/// with no matching reply fails as a connection error.
#[derive(Debug, Default)]
pub struct MockTransport {
    routes: Arc<RwLock<Vec<(String, Reply)>>>,
    requests: Arc<RwLock<Vec<String>>>,
    delay: Arc<RwLock<Option<Duration>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer URLs containing `pattern` with `body`.
    pub async fn respond(&self, pattern: &str, body: &str) {
        self.route(pattern, Reply::Body(body.to_string())).await;
    }

    /// Answer URLs containing `pattern` with a non-success status.
    pub async fn fail_status(&self, pattern: &str, status: u16) {
        self.route(pattern, Reply::Status(status)).await;
    }

    /// Fail URLs containing `pattern` as if the host were down.
    pub async fn fail_connection(&self, pattern: &str) {
        self.route(pattern, Reply::Unreachable).await;
    }

    /// Delay every request by `delay`.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = Some(delay);
    }

    /// URLs requested so far, in request order.
    pub async fn requested_urls(&self) -> Vec<String> {
        self.requests.read().await.clone()
    }

    async fn route(&self, pattern: &str, reply: Reply) {
        self.routes.write().await.push((pattern.to_string(), reply));
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn name(&self) -> &str {
        "mock"
    }

    async fn get_text(&self, url: &str) -> Result<String, SourceError> {
        self.requests.write().await.push(url.to_string());

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = self
            .routes
            .read()
            .await
            .iter()
            .find(|(pattern, _)| url.contains(pattern.as_str()))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(Reply::Body(body)) => Ok(body),
            Some(Reply::Status(status)) => Err(SourceError::HttpStatus {
                status,
                body: String::new(),
            }),
            Some(Reply::Unreachable) | None => Err(SourceError::ConnectionFailed(format!(
                "no route to {}",
                url
            ))),
        }
    }
}
