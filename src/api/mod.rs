//! Backend REST client module

mod client;
mod traits;

pub use client::HttpApiClient;
pub use traits::ApiClient;
#[cfg(test)]
pub use traits::MockApiClient;

use thiserror::Error;

/// Errors surfaced by backend calls.
///
/// All of these are user-recoverable: the operation stays retryable and
/// the message is shown as a toast.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status and a message
    #[error("{message}")]
    Backend { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("not signed in")]
    Unauthenticated,
}

/// Shape of backend error payloads: `{"error": "..."}`
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_displays_message_only() {
        let err = ApiError::Backend {
            status: 422,
            message: "Email already registered".to_string(),
        };
        assert_eq!(err.to_string(), "Email already registered");
    }

    #[test]
    fn test_error_body_tolerates_missing_field() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.error.is_none());
        let body: ErrorBody = serde_json::from_str(r#"{"error":"nope"}"#).unwrap();
        assert_eq!(body.error.as_deref(), Some("nope"));
    }
}
