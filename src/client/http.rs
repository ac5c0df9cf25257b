//! reqwest-backed transport.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use super::{Transport, TransportError};

/// HTTP transport with a shared connection pool
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Arc<Client>,
}

impl HttpTransport {
    /// Create a transport with no request timeout
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(None)
    }

    /// Create a transport; `None` waits for the service indefinitely.
    ///
    /// A configured timeout bounds both connecting and the whole request.
    pub fn with_timeout(timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .pool_idle_timeout(Duration::from_secs(90));

        if let Some(timeout) = timeout {
            builder = builder.connect_timeout(timeout).timeout(timeout);
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client: Arc::new(client),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, TransportError> {
        let response = self.client.post(url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} answered with status {}", url, status);
        }

        Ok(response.json::<Value>().await?)
    }

    async fn get_json(&self, url: &str) -> Result<Value, TransportError> {
        let response = self.client.get(url).send().await?;
        Ok(response.json::<Value>().await?)
    }
}
