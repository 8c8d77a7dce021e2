//! JSON-over-HTTP transport shared by the search clients.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use gclusters_types::error::{GcError, Result};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches JSON documents.
///
/// Implementations return `Err` for transport failures, non-success
/// statuses and bodies that are not JSON.
#[async_trait]
pub trait JsonTransport: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value>;

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value>;
}

/// [`JsonTransport`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    bearer: Option<String>,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            bearer: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Send `Authorization: Bearer {token}` with every request.
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let mut request = request
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.timeout);
        if let Some(token) = &self.bearer {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GcError::Http(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GcError::Http(format!("server responded with {status}")));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| GcError::Http(format!("invalid JSON body: {e}")))
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

#[async_trait]
impl JsonTransport for HttpTransport {
    async fn get_json(&self, url: &str) -> Result<Value> {
        log::debug!("GET {url}");
        self.send(self.client.get(url)).await
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value> {
        log::debug!("POST {url}");
        self.send(self.client.post(url).json(body)).await
    }
}
