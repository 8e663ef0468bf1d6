use reqwest::StatusCode;
use thiserror::Error;

/// Failures of a single catalog search.
///
/// `Display` carries internal detail and is meant for logs. Callers over HTTP
/// only ever see [`SearchError::public_message`].
#[derive(Clone, Debug, Error)]
pub enum SearchError {
    #[error("missing search query")]
    MissingQuery,

    #[error("invalid limit {0:?}")]
    InvalidLimit(String),

    #[error("token exchange failed: {0}")]
    TokenExchangeFailed(String),

    #[error("catalog search failed: {0}")]
    UpstreamSearchFailed(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl SearchError {
    pub fn status(&self) -> StatusCode {
        match self {
            SearchError::MissingQuery | SearchError::InvalidLimit(_) => StatusCode::BAD_REQUEST,
            SearchError::TokenExchangeFailed(_)
            | SearchError::UpstreamSearchFailed(_)
            | SearchError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn public_message(&self) -> &'static str {
        match self {
            SearchError::MissingQuery => "Missing search query",
            SearchError::InvalidLimit(_) => "Invalid limit",
            SearchError::UpstreamSearchFailed(_) => "Spotify search failed",
            SearchError::TokenExchangeFailed(_) | SearchError::Unexpected(_) => "Unexpected error",
        }
    }

    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }
}
