//! Commit message generation: API first, heuristic fallback second.

use tracing::{debug, warn};

use crate::api::{ApiConfig, request_completion};
use crate::diff::DiffStats;
use crate::error::{ApiError, HookError};
use crate::fallback::fallback_message;
use crate::issue::{IssueId, extract_issue};
use crate::message::GeneratedMessage;
use crate::prompt::build_commit_prompt;

/// Result of one attempt at the API path.
#[derive(Debug)]
pub enum ApiOutcome {
    Accepted(GeneratedMessage),
    Rejected(ApiError),
}

/// The message that will be written, and how it was obtained.
#[derive(Debug)]
pub enum Generation {
    Api(GeneratedMessage),
    Fallback {
        message: GeneratedMessage,
        reason: ApiError,
    },
}

impl Generation {
    pub fn message(&self) -> &GeneratedMessage {
        match self {
            Generation::Api(message) => message,
            Generation::Fallback { message, .. } => message,
        }
    }

    pub fn into_message(self) -> GeneratedMessage {
        match self {
            Generation::Api(message) => message,
            Generation::Fallback { message, .. } => message,
        }
    }

    /// Why the API answer was not used, when the fallback was taken.
    pub fn fallback_reason(&self) -> Option<&ApiError> {
        match self {
            Generation::Api(_) => None,
            Generation::Fallback { reason, .. } => Some(reason),
        }
    }
}

/// Generates commit messages for staged diffs.
#[derive(Debug, Clone)]
pub struct MessageGenerator {
    config: ApiConfig,
}

impl MessageGenerator {
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    /// Produce the commit message for `diff` on `branch_name`.
    ///
    /// This only fails with [`HookError::EmptyDiff`]. Every API problem
    /// (missing key, transport, timeout, invalid answer) is logged and
    /// answered with the heuristic message instead.
    pub async fn generate(&self, diff: &str, branch_name: &str) -> Result<Generation, HookError> {
        if diff.trim().is_empty() {
            return Err(HookError::EmptyDiff);
        }

        let issue = extract_issue(branch_name);
        debug!(
            "Branch '{}' -> issue {}",
            branch_name,
            issue.as_ref().map(IssueId::as_str).unwrap_or("none")
        );

        match self.attempt_api(diff, issue.clone()).await {
            ApiOutcome::Accepted(message) => Ok(Generation::Api(message)),
            ApiOutcome::Rejected(reason) => {
                if reason.is_configuration() {
                    // The hook prints configuration problems to the user itself.
                    debug!("Messages API not configured: {}", reason);
                } else {
                    warn!("Messages API unavailable: {}. Using fallback message.", reason);
                }
                let stats = DiffStats::from_diff(diff);
                debug!(
                    "Fallback stats: {} files, {} additions, {} deletions",
                    stats.files_changed, stats.additions, stats.deletions
                );
                Ok(Generation::Fallback {
                    message: fallback_message(&stats, issue),
                    reason,
                })
            }
        }
    }

    /// Ask the API for a message and validate the answer.
    pub async fn attempt_api(&self, diff: &str, issue: Option<IssueId>) -> ApiOutcome {
        let prompt = build_commit_prompt(diff, issue.as_ref());

        let text = match request_completion(&self.config, &prompt).await {
            Ok(text) => text,
            Err(e) => return ApiOutcome::Rejected(e),
        };

        let message = GeneratedMessage::from_api_text(&text, issue);
        if message.title.is_empty() {
            // The answer held nothing but an issue trailer.
            return ApiOutcome::Rejected(ApiError::EmptyResponse);
        }

        ApiOutcome::Accepted(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageSource;

    const DIFF: &str = "\
diff --git a/src/lib.rs b/src/lib.rs
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1 +1,2 @@
 pub mod a;
+pub mod b;
";

    #[tokio::test]
    async fn test_generate_empty_diff_is_error() {
        let generator = MessageGenerator::new(ApiConfig::default());
        assert!(matches!(
            generator.generate("", "CAM-1").await,
            Err(HookError::EmptyDiff)
        ));
        assert!(matches!(
            generator.generate("\n  \n", "CAM-1").await,
            Err(HookError::EmptyDiff)
        ));
    }

    #[tokio::test]
    async fn test_generate_without_key_falls_back() {
        let generator = MessageGenerator::new(ApiConfig::default());
        let generation = generator.generate(DIFF, "feature/CAM-421-test").await.unwrap();

        assert!(matches!(
            generation.fallback_reason(),
            Some(ApiError::MissingApiKey)
        ));
        let message = generation.message();
        assert_eq!(message.source, MessageSource::Fallback);
        assert_eq!(message.title, "[CAM-421] feat: update 1 files");
        assert_eq!(message.trailer(), "issue: CAM-421");
    }

    #[tokio::test]
    async fn test_attempt_api_without_key_is_rejected() {
        let generator = MessageGenerator::new(ApiConfig::default());
        let outcome = generator.attempt_api(DIFF, None).await;
        assert!(matches!(outcome, ApiOutcome::Rejected(ApiError::MissingApiKey)));
    }
}
