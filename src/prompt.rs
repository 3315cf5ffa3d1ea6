//! Prompt construction for AI-generated commit messages.

use crate::issue::IssueId;
use crate::message::CommitType;

/// Maximum bytes of diff text embedded in the prompt.
pub const MAX_DIFF_LENGTH: usize = 30_000;

/// Maximum title length, counting the `[ISSUE] ` prefix.
pub const MAX_TITLE_LENGTH: usize = 50;

/// Build the instruction sent to the model.
///
/// Embeds the issue key, the exact output format, the numbered rules and the
/// diff in a fenced block. The `[ISSUE]` title prefix is only asked for when
/// there is an issue; the trailer always is. Diffs over [`MAX_DIFF_LENGTH`]
/// bytes are cut with a note.
pub fn build_commit_prompt(diff: &str, issue: Option<&IssueId>) -> String {
    let (diff_text, truncated) = truncate_diff(diff, MAX_DIFF_LENGTH);

    let types = CommitType::ALL
        .iter()
        .map(CommitType::as_str)
        .collect::<Vec<_>>()
        .join(", ");

    let valid_types = format!("Valid types: {types}");
    let mut rules = vec![
        valid_types.as_str(),
        "Short title should be clear and specific",
        "Description should be 1-3 sentences explaining the change",
    ];

    // Without an issue the title carries no bracket prefix at all.
    let (title_line, issue_str) = match issue {
        Some(issue) => {
            rules.push("Always include the issue prefix in brackets at the start");
            (
                format!(
                    "[{issue}] type: short title (max {MAX_TITLE_LENGTH} chars including the issue prefix)"
                ),
                issue.as_str(),
            )
        }
        None => (format!("type: short title (max {MAX_TITLE_LENGTH} chars)"), "none"),
    };
    rules.push("Always include the issue line at the end");
    rules.push("Do NOT include any other text or explanations");

    let rules = rules
        .iter()
        .enumerate()
        .map(|(i, rule)| format!("{}. {}", i + 1, rule))
        .collect::<Vec<_>>()
        .join("\n");

    let truncation_note = if truncated {
        "\n\nNote: The diff was truncated due to size. Focus on the visible changes."
    } else {
        ""
    };

    format!(
        r#"Analyze the following code changes and generate a concise and descriptive commit message.
The message should follow this EXACT format:

{title_line}

Detailed description of what changed and why.
Include technical details and impact.

issue: {issue_str}

Rules:
{rules}

Changes to analyze:
```diff
{diff_text}
```{truncation_note}"#
    )
}

/// Cut `text` to at most `max_len` bytes on a char boundary.
fn truncate_diff(text: &str, max_len: usize) -> (&str, bool) {
    if text.len() <= max_len {
        return (text, false);
    }
    let mut end = max_len;
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    (&text[..end], true)
}
