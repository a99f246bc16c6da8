//! Errors raised by the admin API layer.

use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Connection(String),

    #[error("{0}")]
    Timeout(String),

    #[error("{method} {endpoint} returned {status}: {body}")]
    Status {
        method: String,
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Unexpected response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("Invalid request header: {0}")]
    InvalidHeader(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("{0}")]
    Auth(String),
}

impl ApiError {
    /// HTTP status of a non-success response, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            ApiError::Connection(e.to_string())
        } else if e.is_timeout() {
            ApiError::Timeout(e.to_string())
        } else {
            ApiError::Http(e.to_string())
        }
    }
}
