//! Unified SDK error types.

use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Payload error: {0}")]
    Payload(#[from] PayloadError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// HTTP-layer (transport) errors.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Malformed response body: {0}")]
    Decode(String),

    #[error("Timeout")]
    Timeout,

    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    MaxRetriesExceeded { attempts: u32, last_error: String },
}

/// A well-formed response that does not carry the data we asked for.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PayloadError {
    /// `status` was present but not the success sentinel.
    #[error("API reported failure (status={status}, code={code:?}): {message}")]
    Failure {
        status: String,
        code: Option<i64>,
        message: String,
    },

    #[error("Missing field in response: {0}")]
    MissingField(&'static str),

    #[error("Unexpected {field} '{value}' (expected '{expected}')")]
    UnexpectedBasis {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
}

// ─── Fetch failure indicator ─────────────────────────────────────────────────

/// Broad class of a failed fetch. Both classes lead to the same fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Network, TLS, non-2xx status, timeout.
    Transport,
    /// 2xx response with a failure sentinel, a missing field or an undecodable body.
    Payload,
}

/// Error indicator exposed next to fallback data.
///
/// Cloneable and display-ready, unlike `SdkError`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchFailure {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Transport,
            message: message.into(),
        }
    }

    pub fn payload(message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::Payload,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<&SdkError> for FetchFailure {
    fn from(err: &SdkError) -> Self {
        let kind = match err {
            SdkError::Payload(_) | SdkError::Serde(_) => FailureKind::Payload,
            SdkError::Http(HttpError::Decode(_)) => FailureKind::Payload,
            #[cfg(feature = "http")]
            SdkError::Http(HttpError::Reqwest(re)) if re.is_decode() => FailureKind::Payload,
            SdkError::Http(_) | SdkError::Validation(_) | SdkError::Other(_) => {
                FailureKind::Transport
            }
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}
