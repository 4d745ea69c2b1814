//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with a mock source per indexer, enabling E2E testing without network
//! access.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use seedscout_core::{testing::MockSource, Aggregator, Config, Source, SourceId};
use seedscout_server::{create_router, AppState};

/// Re-export fixtures for test convenience
pub use seedscout_core::testing::fixtures;

/// Test fixture for E2E testing with mock dependencies.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_find_downloads() {
///     let fixture = TestFixture::new();
///     fixture.apibay.set_results(vec![fixtures::candidate("abc", 5, SourceId::Apibay)]).await;
///
///     let response = fixture.post("/api/v1/downloads", json!({
///         "display_title": "Heat", "media_kind": "movie"
///     })).await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    pub yts: Arc<MockSource>,
    pub eztv: Arc<MockSource>,
    pub apibay: Arc<MockSource>,
    pub solidtorrents: Arc<MockSource>,
    /// Root token handed to the app state
    pub shutdown: CancellationToken,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with an empty mock per source.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a test fixture serving the given configuration.
    pub fn with_config(config: Config) -> Self {
        let yts = Arc::new(MockSource::new(SourceId::Yts));
        let eztv = Arc::new(MockSource::new(SourceId::Eztv));
        let apibay = Arc::new(MockSource::new(SourceId::Apibay));
        let solidtorrents = Arc::new(MockSource::new(SourceId::Solidtorrents).with_limit(8));

        let sources: Vec<Arc<dyn Source>> = vec![
            yts.clone(),
            eztv.clone(),
            apibay.clone(),
            solidtorrents.clone(),
        ];
        let shutdown = CancellationToken::new();
        let state = Arc::new(AppState::new(
            config,
            Aggregator::new(sources),
            shutdown.clone(),
        ));

        Self {
            router: create_router(state),
            yts,
            eztv,
            apibay,
            solidtorrents,
            shutdown,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, bytes) = self.send(request).await;
        TestResponse {
            status,
            body: serde_json::from_slice(&bytes).unwrap_or(Value::Null),
        }
    }

    /// GET a non-JSON endpoint and return the body as text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        let (status, bytes) = self.send(request).await;
        (status, String::from_utf8(bytes).expect("body should be UTF-8"))
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();
        let (status, body_bytes) = self.send(request).await;

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, body_bytes.to_vec())
    }
}
