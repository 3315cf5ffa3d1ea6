//! Heuristic commit message used when the API path is rejected.
//!
//! Pure function of the diff statistics and the issue key: no network, no
//! clock, so the same inputs always give the same message.

use crate::diff::DiffStats;
use crate::issue::IssueId;
use crate::message::{CommitType, GeneratedMessage, MessageSource};

/// One row of the classification table.
struct FallbackRule {
    applies: fn(&DiffStats) -> bool,
    commit_type: CommitType,
    description: &'static str,
}

/// Checked in order; the first rule that applies wins.
static RULES: [FallbackRule; 4] = [
    FallbackRule {
        applies: DiffStats::touches_docs,
        commit_type: CommitType::Docs,
        description: "Update documentation files",
    },
    FallbackRule {
        applies: DiffStats::touches_tests,
        commit_type: CommitType::Test,
        description: "Update test files and specifications",
    },
    FallbackRule {
        applies: removes_more_than_adds,
        commit_type: CommitType::Refactor,
        description: "Refactor code and remove unused elements",
    },
    FallbackRule {
        applies: always,
        commit_type: CommitType::Feat,
        description: "Implement new features and functionality",
    },
];

fn removes_more_than_adds(stats: &DiffStats) -> bool {
    stats.deletions > stats.additions
}

fn always(_: &DiffStats) -> bool {
    true
}

/// Pick the commit type and description for a diff.
pub fn classify(stats: &DiffStats) -> (CommitType, &'static str) {
    let rule = RULES
        .iter()
        .find(|rule| (rule.applies)(stats))
        .unwrap_or(&RULES[RULES.len() - 1]);
    (rule.commit_type, rule.description)
}

/// Build the fallback message for a diff.
///
/// ```text
/// [CAM-1] feat: update 3 files
///
/// Implement new features and functionality. Modified 3 files with 10 additions and 2 deletions.
///
/// issue: CAM-1
/// ```
pub fn fallback_message(stats: &DiffStats, issue: Option<IssueId>) -> GeneratedMessage {
    let (commit_type, description) = classify(stats);
    let files = stats.files_changed;

    let title = match &issue {
        Some(issue) => format!("[{issue}] {commit_type}: update {files} files"),
        None => format!("{commit_type}: update {files} files"),
    };

    let body = format!(
        "{description}. Modified {files} files with {} additions and {} deletions.",
        stats.additions, stats.deletions
    );

    GeneratedMessage {
        title,
        body,
        commit_type: Some(commit_type),
        issue,
        source: MessageSource::Fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::extract_issue;

    fn stats(paths: &[&str], additions: usize, deletions: usize) -> DiffStats {
        DiffStats {
            files_changed: paths.len(),
            additions,
            deletions,
            paths: paths.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn test_feat_scenario_with_issue() {
        let s = stats(&["src/a.rs", "src/b.rs", "src/c.rs"], 10, 2);
        let msg = fallback_message(&s, extract_issue("CAM-1-x"));
        assert_eq!(msg.title, "[CAM-1] feat: update 3 files");
        assert_eq!(
            msg.body,
            "Implement new features and functionality. Modified 3 files with 10 additions and 2 deletions."
        );
        assert_eq!(msg.trailer(), "issue: CAM-1");
        assert_eq!(msg.source, MessageSource::Fallback);
    }

    #[test]
    fn test_docs_scenario_without_issue() {
        let s = stats(&["README.md"], 4, 1);
        let msg = fallback_message(&s, extract_issue("main"));
        assert_eq!(msg.title, "docs: update 1 files");
        assert_eq!(msg.commit_type, Some(CommitType::Docs));
        assert!(msg.format().ends_with("\n\nissue: none"));
    }

    #[test]
    fn test_docs_beats_test() {
        let s = stats(&["tests/README.md", "tests/api_test.rs"], 1, 9);
        assert_eq!(classify(&s).0, CommitType::Docs);
    }

    #[test]
    fn test_test_beats_refactor() {
        let s = stats(&["src/spec_helper.rb"], 0, 20);
        assert_eq!(
            classify(&s),
            (CommitType::Test, "Update test files and specifications")
        );
    }

    #[test]
    fn test_refactor_when_more_deletions() {
        let s = stats(&["src/lib.rs"], 3, 4);
        assert_eq!(
            classify(&s),
            (CommitType::Refactor, "Refactor code and remove unused elements")
        );
    }

    #[test]
    fn test_feat_on_equal_counts() {
        let s = stats(&["src/lib.rs"], 5, 5);
        assert_eq!(classify(&s).0, CommitType::Feat);
    }

    #[test]
    fn test_fallback_is_idempotent() {
        let s = stats(&["src/lib.rs", "docs/guide.txt"], 7, 1);
        let first = fallback_message(&s, extract_issue("feature/OPS-12-docs"));
        let second = fallback_message(&s, extract_issue("feature/OPS-12-docs"));
        assert_eq!(first, second);
        assert_eq!(first.format(), second.format());
    }

    #[test]
    fn test_format_layout() {
        let s = stats(&["src/lib.rs"], 1, 0);
        let msg = fallback_message(&s, extract_issue("ABC-9"));
        assert_eq!(
            msg.format(),
            "[ABC-9] feat: update 1 files\n\nImplement new features and functionality. Modified 1 files with 1 additions and 0 deletions.\n\nissue: ABC-9"
        );
    }
}
