//! Outbound HTTP transport for indexer requests.
//!
//! Sources never talk to reqwest directly. In sandboxed deployments every
//! request has to go through a URL-in-URL forwarding relay, elsewhere it
//! should not; both are a [`Transport`] and are swapped by configuration.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::{TransportConfig, TransportMode};

use super::SourceError;

/// Bodies of failed responses are cut to this many characters in errors.
const ERROR_BODY_PREVIEW: usize = 200;

/// Fetches response bodies for indexer URLs.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Transport name for logging.
    fn name(&self) -> &str;

    /// GET `url` and return the body of a successful response.
    async fn get_text(&self, url: &str) -> Result<String, SourceError>;
}

/// Calls indexers directly.
pub struct DirectTransport {
    client: Client,
}

impl DirectTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, SourceError> {
        Ok(Self {
            client: build_client(config)?,
        })
    }
}

#[async_trait]
impl Transport for DirectTransport {
    fn name(&self) -> &str {
        "direct"
    }

    async fn get_text(&self, url: &str) -> Result<String, SourceError> {
        send_get(&self.client, url).await
    }
}

/// Forwards requests through a public relay: `<prefix><url-encoded target>`.
pub struct RelayTransport {
    client: Client,
    prefix: String,
}

impl RelayTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, SourceError> {
        let prefix = config
            .relay_url
            .clone()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| SourceError::NotConfigured("relay_url is not set".to_string()))?;
        Ok(Self {
            client: build_client(config)?,
            prefix,
        })
    }

    /// The relay URL that fetches `target`.
    pub fn relay_url(&self, target: &str) -> String {
        format!("{}{}", self.prefix, urlencoding::encode(target))
    }
}

#[async_trait]
impl Transport for RelayTransport {
    fn name(&self) -> &str {
        "relay"
    }

    async fn get_text(&self, url: &str) -> Result<String, SourceError> {
        send_get(&self.client, &self.relay_url(url)).await
    }
}

/// Create the transport selected by configuration.
pub fn create_transport(config: &TransportConfig) -> Result<Arc<dyn Transport>, SourceError> {
    match config.mode {
        TransportMode::Direct => Ok(Arc::new(DirectTransport::new(config)?)),
        TransportMode::Relay => Ok(Arc::new(RelayTransport::new(config)?)),
    }
}

fn build_client(config: &TransportConfig) -> Result<Client, SourceError> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs as u64))
        .user_agent(config.user_agent.as_str())
        .build()
        .map_err(|e| SourceError::NotConfigured(format!("Failed to create HTTP client: {}", e)))
}

async fn send_get(client: &Client, url: &str) -> Result<String, SourceError> {
    debug!(url = %url, "GET");

    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(SourceError::HttpStatus {
            status: status.as_u16(),
            body: body.chars().take(ERROR_BODY_PREVIEW).collect(),
        });
    }

    Ok(response.text().await?)
}
