//! Staged diff reading and summarization.

pub mod staged;
pub mod stats;

pub use staged::{current_branch, read_staged_diff};
pub use stats::DiffStats;
