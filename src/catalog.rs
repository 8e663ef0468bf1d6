//! Track search against the catalog API.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::config::UpstreamConfig;
use crate::credentials::CredentialProvider;
use crate::error::SearchError;

pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 50;

/// Raw query parameters as they arrive at the proxy.
#[derive(Debug, Default)]
pub struct SearchParams {
    pub q: Option<String>,
    pub limit: Option<String>,
}

impl SearchParams {
    /// Collects `q` and `limit` from decoded query pairs. A repeated key keeps
    /// its first value; unknown keys are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_ref() {
                "q" => &mut params.q,
                "limit" => &mut params.limit,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into());
            }
        }
        params
    }

    /// The query is checked before the limit, so a request missing both
    /// reports the missing query.
    pub fn validate(&self) -> Result<SearchQuery, SearchError> {
        let query = self.q.as_deref().unwrap_or_default();
        if query.trim().is_empty() {
            return Err(SearchError::MissingQuery);
        }
        let limit = match self.limit.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<u32>()
                    .map_err(|_| SearchError::InvalidLimit(raw.to_string()))?,
            ),
        };
        SearchQuery::new(query, limit)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub limit: u32,
}

impl SearchQuery {
    pub fn new(query: &str, limit: Option<u32>) -> Result<Self, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::MissingQuery);
        }
        let limit = limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(SearchError::InvalidLimit(limit.to_string()));
        }
        Ok(Self {
            query: query.to_string(),
            limit,
        })
    }
}

/// Catalog response body, exactly as the catalog sent it.
#[derive(Clone, Debug)]
pub struct CatalogResult {
    body: Vec<u8>,
}

impl CatalogResult {
    pub fn as_bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_slice(&self.body)
    }
}

pub struct CatalogSearch {
    http: reqwest::Client,
    search_url: String,
    credentials: Arc<CredentialProvider>,
}

impl CatalogSearch {
    pub fn new(
        http: reqwest::Client,
        config: &UpstreamConfig,
        credentials: Arc<CredentialProvider>,
    ) -> Self {
        Self {
            http,
            search_url: config.search_url.clone(),
            credentials,
        }
    }

    /// Searches tracks for `query`, returning at most `limit` (default 10)
    /// matches. An empty query fails before any outbound call.
    pub async fn search(
        &self,
        query: &str,
        limit: Option<u32>,
    ) -> Result<CatalogResult, SearchError> {
        let query = SearchQuery::new(query, limit)?;
        self.run(&query).await
    }

    pub async fn run(&self, query: &SearchQuery) -> Result<CatalogResult, SearchError> {
        let token = self.credentials.get_credential().await?;

        debug!(q = %query.query, limit = query.limit, "searching catalog");
        let limit = query.limit.to_string();
        let resp = self
            .http
            .get(&self.search_url)
            .bearer_auth(&token)
            .query(&[
                ("q", query.query.as_str()),
                ("type", "track"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|err| {
                error!(error = %err, "catalog search request failed");
                SearchError::UpstreamSearchFailed(err.to_string())
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            error!(%status, %body, "catalog search rejected");
            return Err(SearchError::UpstreamSearchFailed(format!(
                "status {}",
                status
            )));
        }

        let body = resp.bytes().await.map_err(|err| {
            warn!(error = %err, "catalog search body unreadable");
            SearchError::Unexpected(format!("read search body: {}", err))
        })?;

        if let Err(err) = serde_json::from_slice::<serde::de::IgnoredAny>(&body) {
            error!(error = %err, "catalog search returned a non-JSON body");
            return Err(SearchError::Unexpected(format!(
                "parse search body: {}",
                err
            )));
        }

        Ok(CatalogResult {
            body: body.to_vec(),
        })
    }
}
