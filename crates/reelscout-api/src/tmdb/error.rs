//! Classified TMDB client errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the TMDB client and credential stores.
///
/// None of these are retried automatically; callers decide.
#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum TmdbError {
    /// No API key is stored and no fallback is configured.
    #[error("TMDB API key not found. Run `reelscout key set --key <KEY>` or set TMDB_API_KEY")]
    MissingCredential,

    /// The remote service rejected the API key (HTTP 401).
    #[error("Invalid API key. Please check your TMDB API key")]
    InvalidCredential,

    /// No response was received.
    #[error("network unavailable: {0}")]
    NetworkUnavailable(#[source] reqwest::Error),

    /// The remote service answered with a non-success status.
    #[error("API request failed (HTTP {status}): {status_text}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// Reason phrase, followed by the TMDB status message when present.
        status_text: String,
    },

    /// The response body is not the expected JSON document.
    #[error("failed to decode JSON response: {0}")]
    DecodeError(#[source] serde_json::Error),

    /// The endpoint path could not be joined onto the base URL.
    #[error("invalid request URL for {path}: {source}")]
    InvalidUrl {
        /// Endpoint path.
        path: String,
        /// Parse error.
        #[source]
        source: url::ParseError,
    },

    /// The credential file could not be read or written.
    #[error("credential storage error at {}: {message}", path.display())]
    Storage {
        /// Credential file path.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// The operation was superseded before it completed.
    #[error("request cancelled")]
    Cancelled,
}

impl TmdbError {
    /// Builds a `RequestFailed` from an HTTP status and optional TMDB message.
    pub(crate) fn request_failed(status: reqwest::StatusCode, message: Option<&str>) -> Self {
        let reason = status.canonical_reason().unwrap_or("Unknown Status");
        let status_text = match message {
            Some(msg) => format!("{reason}: {msg}"),
            None => String::from(reason),
        };
        Self::RequestFailed {
            status: status.as_u16(),
            status_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failed_uses_reason_phrase() {
        // Arrange & Act
        let err = TmdbError::request_failed(reqwest::StatusCode::INTERNAL_SERVER_ERROR, None);

        // Assert
        assert_eq!(err.to_string(), "API request failed (HTTP 500): Internal Server Error");
    }

    #[test]
    fn test_request_failed_appends_tmdb_message() {
        // Arrange & Act
        let err = TmdbError::request_failed(
            reqwest::StatusCode::NOT_FOUND,
            Some("The resource you requested could not be found."),
        );

        // Assert
        assert!(matches!(err, TmdbError::RequestFailed { status: 404, .. }));
        assert!(err.to_string().contains("Not Found: The resource"));
    }

    #[test]
    fn test_missing_credential_message_is_actionable() {
        // Arrange & Act
        let msg = TmdbError::MissingCredential.to_string();

        // Assert
        assert!(msg.contains("API key not found"));
        assert!(msg.contains("TMDB_API_KEY"));
    }
}
