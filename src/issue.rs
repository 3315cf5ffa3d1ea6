//! Issue key extraction from branch names.

use std::fmt;
use std::sync::LazyLock;

use regex_lite::Regex;

/// Uppercase project prefix, a dash, then digits (e.g. `CAM-942`, `TRIGB2B-42141`).
const ISSUE_PATTERN: &str = r"[A-Z][A-Z0-9]*-[0-9]+";

static ISSUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(ISSUE_PATTERN).expect("issue pattern is a valid regex"));

/// A ticket identifier taken from the current branch name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IssueId(String);

impl IssueId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Return the first issue key found anywhere in `branch_name`.
///
/// Branch prefixes like `feature/` are not special-cased: the whole string is
/// scanned, so `feature/CAM-421-test` yields `CAM-421`.
pub fn extract_issue(branch_name: &str) -> Option<IssueId> {
    ISSUE_RE
        .find(branch_name)
        .map(|m| IssueId(m.as_str().to_string()))
}
