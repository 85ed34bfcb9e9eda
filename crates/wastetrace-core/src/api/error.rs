use serde::Deserialize;
use thiserror::Error;

use crate::models::ValidationError;

/// Errors surfaced by the API gateway client.
///
/// `Timeout` and `Network` are transport failures with no server verdict;
/// `AuthRejected` invalidates the local session before it propagates;
/// `Validation` and `Server` carry a human-readable message from the
/// response body and never touch session state.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("authentication rejected - please log in again")]
    AuthRejected,

    #[error("{0}")]
    Validation(String),

    #[error("server error: {0}")]
    Server(String),
}

/// Maximum length for messages extracted from error response bodies.
const MAX_ERROR_MESSAGE_LENGTH: usize = 500;

/// Fallback when a 4xx body carries no usable message.
const CLIENT_ERROR_FALLBACK: &str = "The server rejected the request";

/// Fallback when a 5xx body carries no usable message.
const SERVER_ERROR_FALLBACK: &str = "The server reported an internal error";

impl ApiError {
    /// Classify a transport-level failure, distinguishing the timeout bound
    /// from other network conditions.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Network(err)
        }
    }

    /// Classify a non-success response by status code and body.
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        match status.as_u16() {
            401 => ApiError::AuthRejected,
            400..=499 => ApiError::Validation(
                extract_message(body).unwrap_or_else(|| CLIENT_ERROR_FALLBACK.to_string()),
            ),
            _ => ApiError::Server(
                extract_message(body)
                    .unwrap_or_else(|| format!("{} ({})", SERVER_ERROR_FALLBACK, status)),
            ),
        }
    }

    /// Whether the failure is transport-level (no server verdict), which the
    /// CLI uses to decide on an offline-cache fallback.
    pub fn is_network_failure(&self) -> bool {
        matches!(self, ApiError::Timeout | ApiError::Network(_))
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

/// Pull the human-readable `message` field out of an error body.
fn extract_message(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        message: Option<String>,
    }

    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .message
        .filter(|m| !m.trim().is_empty())
        .map(|m| truncate(&m))
}

fn truncate(message: &str) -> String {
    if message.len() <= MAX_ERROR_MESSAGE_LENGTH {
        message.to_string()
    } else {
        let mut end = MAX_ERROR_MESSAGE_LENGTH;
        while !message.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated)", &message[..end])
    }
}
