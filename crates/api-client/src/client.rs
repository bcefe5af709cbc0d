use std::time::Duration;

use anyhow::{bail, Result};

use klife_api::session::LOGIN_PATH;
use klife_api::{HealthResponse, LoginRequest, OkResponse};

/// Typed HTTP client for the k-life server's own `/api` endpoints.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new client with the given base URL and timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create from an existing `reqwest::Client` (e.g. shared in tests).
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    // ── Health ────────────────────────────────────────────────────────────

    pub async fn health(&self) -> Result<HealthResponse> {
        let resp = self.client.get(self.url("/health")).send().await?;
        parse_response(resp).await
    }

    // ── Auth ──────────────────────────────────────────────────────────────

    /// The local strict login endpoint (`POST /api/login`).
    pub async fn local_login(&self, req: &LoginRequest) -> Result<OkResponse> {
        let resp = self
            .client
            .post(self.url("/login"))
            .json(req)
            .send()
            .await?;
        parse_response(resp).await
    }

    /// Clear the session cookies. Returns the page to navigate to next.
    pub async fn logout(&self) -> Result<&'static str> {
        let resp = self.client.post(self.url("/logout")).send().await?;
        let body: OkResponse = parse_response(resp).await?;
        tracing::debug!("logout: {}", body.message);
        Ok(LOGIN_PATH)
    }
}

/// Parse an HTTP response: return the deserialized body on 2xx,
/// or an error containing the status and body text.
async fn parse_response<T: serde::de::DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        bail!("{status}: {body}");
    }
    Ok(resp.json().await?)
}
