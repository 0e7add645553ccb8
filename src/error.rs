//! Errors returned when talking to a task source

use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong between this crate and a task backend.
///
/// The notification and statistics engines never fail; only task sources do.
#[derive(Debug, Error)]
pub enum Error {
    /// The backend could not be reached at all
    #[error("error connecting to server: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend replied with a 404
    #[error("not found")]
    NotFound,

    /// The backend rejected the credentials (401/403). The user should sign in again
    #[error("authentication failed ({0})")]
    Unauthorized(StatusCode),

    /// No token is set, so the request was not even sent
    #[error("please sign in to continue")]
    NotAuthenticated,

    /// The request was rejected before being sent (e.g. mismatching passwords)
    #[error("{0}")]
    InvalidInput(String),

    /// Any other non-2xx reply
    #[error("unexpected HTTP status code {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("invalid JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A failure injected by a [`MockBehaviour`](crate::mock_behaviour::MockBehaviour)
    #[error("{0}")]
    Mocked(String),
}

impl Error {
    /// Whether the user must (re-)authenticate before retrying
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Error::Unauthorized(_) | Error::NotAuthenticated)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound)
    }

    /// Classify a non-2xx HTTP reply
    pub(crate) fn from_status(status: StatusCode, body: String) -> Self {
        match status {
            StatusCode::NOT_FOUND => Error::NotFound,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Unauthorized(status),
            _ => Error::Status { status, body },
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Turns a 404 into `None`, and leaves other results untouched
pub(crate) fn not_found_as_none<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(Error::NotFound) => Ok(None),
        Err(err) => Err(err),
    }
}
