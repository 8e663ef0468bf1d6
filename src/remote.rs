use anyhow::{Context, Result};

use crate::model::{TrackSearchResponse, TrackSummary, match_query};

mod http_client;

mod search;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Blocking client for a running `resonance-server`.
pub struct RemoteClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl RemoteClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            anyhow::bail!("server url is empty");
        }
        let client = reqwest::blocking::Client::builder()
            .user_agent("resonance")
            .build()
            .context("build reqwest client")?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
