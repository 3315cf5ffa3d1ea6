//! hookscribe - a `prepare-commit-msg` hook that writes commit messages with Claude.
//!
//! # Overview
//!
//! At commit time the hook reads the staged diff and the branch name, pulls an
//! issue key such as `CAM-421` out of the branch, and asks the Messages API for
//! a commit message in a fixed format. When the API cannot be used (no key,
//! network failure, timeout, unusable answer) a heuristic message is built from
//! the diff instead. Every message ends with an `issue: <key|none>` trailer.

pub mod api;
pub mod diff;
pub mod error;
pub mod fallback;
pub mod generator;
pub mod hook;
pub mod issue;
pub mod message;
pub mod prompt;

// Re-export commonly used types
pub use api::ApiConfig;
pub use diff::DiffStats;
pub use error::{ApiError, HookError, InstallError};
pub use generator::{ApiOutcome, Generation, MessageGenerator};
pub use issue::{IssueId, extract_issue};
pub use message::{CommitType, GeneratedMessage, MessageSource};
