//! HTTP client for the notes backend's local REST API.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::request::{BackendRequest, HttpMethod};
use crate::config::BridgeConfig;
use crate::error::{BridgeError, Result};

/// Body the backend returns from `GET /ping`.
pub const PING_SENTINEL: &str = "JoplinClipperServer";

/// Upper bound on any single backend call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: Url,
    token: Option<String>,
    http: reqwest::Client,
}

impl BackendClient {
    pub fn new(config: &BridgeConfig) -> Result<Self> {
        Self::with_timeout(config, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(config: &BridgeConfig, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: config.backend_url()?,
            token: config.token().map(String::from),
            http,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issue an authenticated request and return the response body text.
    ///
    /// Any status >= 400 becomes [`BridgeError::Api`] carrying the body.
    pub async fn send(&self, request: &BackendRequest) -> Result<String> {
        let url = request.url(&self.base_url, self.token.as_deref())?;
        self.execute(request.method, url, request.body()).await
    }

    /// Check that the backend is up and is the notes app we expect.
    pub async fn ping(&self) -> Result<()> {
        let url = BackendRequest::get(["ping"]).url(&self.base_url, None)?;
        let body = self.execute(HttpMethod::Get, url, None).await?;
        if body != PING_SENTINEL {
            return Err(BridgeError::UnexpectedPing(body));
        }
        Ok(())
    }

    async fn execute(&self, method: HttpMethod, url: Url, body: Option<&Value>) -> Result<String> {
        // Only the path is logged; the query may carry the token.
        debug!(%method, path = %url.path(), "backend request");

        let mut builder = self.http.request(method.into(), url);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status.as_u16() >= 400 {
            warn!(%method, status = status.as_u16(), "backend returned an error");
            return Err(BridgeError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }
}
