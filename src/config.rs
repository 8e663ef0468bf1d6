use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use base64::Engine;

pub const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_SEARCH_URL: &str = "https://api.spotify.com/v1/search";

/// Where the identity and catalog endpoints live, and how long to wait on them.
#[derive(Clone, Debug)]
pub struct UpstreamConfig {
    pub accounts_url: String,
    pub search_url: String,
    pub request_timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            accounts_url: DEFAULT_ACCOUNTS_URL.to_string(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }
}

impl UpstreamConfig {
    #[must_use]
    pub fn with_accounts_url(mut self, url: impl Into<String>) -> Self {
        self.accounts_url = url.into();
        self
    }

    #[must_use]
    pub fn with_search_url(mut self, url: impl Into<String>) -> Self {
        self.search_url = url.into();
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent("resonance")
            .timeout(self.request_timeout)
            .build()
            .context("build reqwest client")
    }
}

/// Client-credentials grant identity for the catalog API.
#[derive(Clone)]
pub struct ClientCredentials {
    client_id: String,
    client_secret: String,
}

impl ClientCredentials {
    /// Both values must be present; there is no built-in fallback.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Result<Self> {
        let client_id = client_id.into().trim().to_string();
        let client_secret = client_secret.into().trim().to_string();
        if client_id.is_empty() {
            anyhow::bail!("catalog client id is not configured");
        }
        if client_secret.is_empty() {
            anyhow::bail!("catalog client secret is not configured");
        }
        Ok(Self {
            client_id,
            client_secret,
        })
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// `Basic base64(client_id:client_secret)`
    pub fn basic_authorization(&self) -> String {
        let raw = format!("{}:{}", self.client_id, self.client_secret);
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(raw)
        )
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}
