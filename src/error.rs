//! Error types for hookscribe modules using thiserror.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors from the generative API path.
///
/// None of these escape [`crate::generator::MessageGenerator::generate`]; every
/// variant rejects the API answer and selects the fallback message.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("CLAUDE_API_KEY is not configured. Set it with: export CLAUDE_API_KEY='your-key-here'")]
    MissingApiKey,

    #[error("Request to the Messages API failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Messages API request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Messages API returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Messages API returned invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Messages API reported an error ({kind}): {message}")]
    ErrorResponse { kind: String, message: String },

    #[error("Messages API response contained no text")]
    EmptyResponse,

    #[error("Messages API response matched the invalid-response sentinel")]
    ErrorSentinel,
}

impl ApiError {
    /// Whether the request never left the process.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ApiError::MissingApiKey)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err)
    }
}

/// Errors from the hook entry point.
#[derive(Error, Debug)]
pub enum HookError {
    #[error("No staged changes for commit")]
    EmptyDiff,

    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),

    #[error("Failed to read staged diff: {0}")]
    DiffFailed(#[source] git2::Error),

    #[error("Failed to write commit message to {path}: {source}")]
    WriteMessage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors from installing, removing or inspecting the hook.
#[derive(Error, Debug)]
pub enum InstallError {
    #[error("No git repository detected at {0}")]
    NotARepository(PathBuf),

    #[error("Hook not found at {0}")]
    HookNotFound(PathBuf),

    #[error(
        "A prepare-commit-msg hook not managed by hookscribe already exists at {0}. Use --force to overwrite it."
    )]
    ForeignHook(PathBuf),

    #[error("Installation cancelled")]
    Cancelled,

    #[error("Failed to prompt for confirmation: {0}")]
    PromptFailed(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_keeps_sub_second_precision() {
        let err = ApiError::Timeout(Duration::from_millis(200));
        assert_eq!(err.to_string(), "Messages API request timed out after 200ms");

        let err = ApiError::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "Messages API request timed out after 30s");
    }

    #[test]
    fn test_only_missing_key_is_configuration() {
        assert!(ApiError::MissingApiKey.is_configuration());
        assert!(!ApiError::Timeout(Duration::from_secs(1)).is_configuration());
        assert!(!ApiError::EmptyResponse.is_configuration());
        assert!(!ApiError::ErrorSentinel.is_configuration());
        assert!(
            !ApiError::HttpStatus {
                status: 500,
                body: String::new()
            }
            .is_configuration()
        );
    }
}
