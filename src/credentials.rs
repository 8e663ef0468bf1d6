//! Client-credentials bearer token for the catalog API.
//!
//! [`CredentialProvider`] owns a single cache slot. A cached token is handed
//! out while the clock is strictly before its `expires_at`; otherwise the
//! provider exchanges the client id and secret for a new token and overwrites
//! the slot. `expires_at` is set one minute ahead of the lifetime the identity
//! endpoint declares, so a token cannot lapse between the freshness check and
//! the catalog call that uses it.
//!
//! At most one exchange is in flight. Callers that find the slot stale while
//! an exchange is running await that same exchange and receive its outcome,
//! success or failure. Once it settles, the next stale caller starts a new one.

use std::sync::{Arc, Mutex, MutexGuard};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use time::{Duration, OffsetDateTime};
use tracing::{debug, error, info};

use crate::config::{ClientCredentials, UpstreamConfig};
use crate::error::SearchError;

mod clock;
pub use self::clock::{Clock, ManualClock, SystemClock};

/// Lifetime assumed when the identity endpoint omits `expires_in`.
pub const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;

/// How much earlier than declared a token is treated as expired.
pub const EARLY_REFRESH_MARGIN: Duration = Duration::minutes(1);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedCredential {
    pub value: String,
    pub expires_at: OffsetDateTime,
}

impl CachedCredential {
    /// Builds the cache entry for a token issued at `now` with the declared
    /// lifetime in seconds.
    pub fn issued(value: String, expires_in: Option<u64>, now: OffsetDateTime) -> Self {
        let secs = expires_in.unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS);
        let lifetime = Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX));
        Self {
            value,
            expires_at: now.saturating_add(lifetime.saturating_sub(EARLY_REFRESH_MARGIN)),
        }
    }

    pub fn is_fresh_at(&self, now: OffsetDateTime) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,

    #[serde(default)]
    expires_in: Option<u64>,
}

type Refresh = Shared<BoxFuture<'static, Result<CachedCredential, SearchError>>>;

#[derive(Default)]
struct Slot {
    cached: Option<CachedCredential>,
    // Generation tags the in-flight exchange so only its own waiters clear it.
    inflight: Option<(u64, Refresh)>,
    generation: u64,
}

pub struct CredentialProvider {
    http: reqwest::Client,
    accounts_url: String,
    credentials: ClientCredentials,
    clock: Arc<dyn Clock>,
    slot: Mutex<Slot>,
}

impl CredentialProvider {
    pub fn new(
        http: reqwest::Client,
        config: &UpstreamConfig,
        credentials: ClientCredentials,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            http,
            accounts_url: config.accounts_url.clone(),
            credentials,
            clock,
            slot: Mutex::new(Slot::default()),
        }
    }

    /// Returns a bearer token that is fresh at the time of the call.
    pub async fn get_credential(&self) -> Result<String, SearchError> {
        let (generation, refresh) = {
            let mut slot = self.lock_slot();
            let now = self.clock.now();

            if let Some(cached) = slot.cached.as_ref()
                && cached.is_fresh_at(now)
            {
                debug!(expires_at = %cached.expires_at, "reusing cached catalog token");
                return Ok(cached.value.clone());
            }

            match &slot.inflight {
                Some((generation, refresh)) => {
                    debug!("joining in-flight catalog token exchange");
                    (*generation, refresh.clone())
                }
                None => {
                    slot.generation += 1;
                    let generation = slot.generation;
                    let refresh = self.start_exchange(now);
                    slot.inflight = Some((generation, refresh.clone()));
                    (generation, refresh)
                }
            }
        };

        let outcome = refresh.await;

        let mut slot = self.lock_slot();
        if matches!(&slot.inflight, Some((current, _)) if *current == generation) {
            slot.inflight = None;
            if let Ok(issued) = &outcome {
                info!(expires_at = %issued.expires_at, "refreshed catalog token");
                slot.cached = Some(issued.clone());
            }
        }
        outcome.map(|issued| issued.value)
    }

    /// Snapshot of the cache slot.
    pub fn cached(&self) -> Option<CachedCredential> {
        self.lock_slot().cached.clone()
    }

    fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn start_exchange(&self, now: OffsetDateTime) -> Refresh {
        let http = self.http.clone();
        let accounts_url = self.accounts_url.clone();
        let credentials = self.credentials.clone();
        async move { exchange(&http, &accounts_url, &credentials, now).await }
            .boxed()
            .shared()
    }
}

async fn exchange(
    http: &reqwest::Client,
    accounts_url: &str,
    credentials: &ClientCredentials,
    now: OffsetDateTime,
) -> Result<CachedCredential, SearchError> {
    debug!(client_id = %credentials.client_id(), "requesting catalog token");

    let resp = http
        .post(accounts_url)
        .header(AUTHORIZATION, credentials.basic_authorization())
        .form(&[("grant_type", "client_credentials")])
        .send()
        .await
        .map_err(|err| {
            error!(error = %err, "catalog token request failed");
            SearchError::TokenExchangeFailed(err.to_string())
        })?;

    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        error!(%status, %body, "catalog token exchange rejected");
        return Err(SearchError::TokenExchangeFailed(format!("status {}", status)));
    }

    let token: TokenResponse = resp.json().await.map_err(|err| {
        error!(error = %err, "catalog token response unreadable");
        SearchError::Unexpected(format!("parse token response: {}", err))
    })?;

    if token.access_token.is_empty() {
        error!("catalog token response carried an empty access_token");
        return Err(SearchError::Unexpected("empty access token".to_string()));
    }

    Ok(CachedCredential::issued(
        token.access_token,
        token.expires_in,
        now,
    ))
}
