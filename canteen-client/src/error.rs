//! Client error types

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connectivity, DNS, protocol)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Credential expired or invalid; the session must re-authenticate
    #[error("Credential expired or invalid")]
    AuthExpired,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error, detected locally before any remote mutation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Structured error returned by a backing service, with its code
    /// and any detail payload intact
    #[error("Service error {}: {}", .0.code, .0.message)]
    Api(AppError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClientError {
    /// Map a reqwest transport failure, separating timeouts
    pub fn transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(err)
        }
    }

    /// The structured service error code, when one was returned
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Api(err) => Some(err.code),
            _ => None,
        }
    }

    /// Whether a retry of the same request could plausibly succeed.
    ///
    /// Only transport failures and server-side system errors qualify;
    /// validation, auth, and business-rule rejections never do.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout => true,
            Self::Internal(_) => true,
            Self::Api(err) => matches!(
                err.code,
                ErrorCode::NetworkError
                    | ErrorCode::TimeoutError
                    | ErrorCode::InternalError
                    | ErrorCode::DatabaseError
            ),
            _ => false,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
