//! Commit message model shared by the API and fallback paths.

use std::fmt;
use std::sync::LazyLock;

use regex_lite::Regex;

use crate::issue::IssueId;

/// Leading `[ISSUE] ` prefix followed by `type(scope)!:`.
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\[[^\]]*\]\s*)?(\w+)(?:\([^)]+\))?!?\s*:")
        .expect("title pattern is a valid regex")
});

/// Commit types the hook asks for and the fallback produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Style,
    Refactor,
    Test,
    Chore,
}

impl CommitType {
    pub const ALL: [CommitType; 7] = [
        CommitType::Feat,
        CommitType::Fix,
        CommitType::Docs,
        CommitType::Style,
        CommitType::Refactor,
        CommitType::Test,
        CommitType::Chore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Docs => "docs",
            CommitType::Style => "style",
            CommitType::Refactor => "refactor",
            CommitType::Test => "test",
            CommitType::Chore => "chore",
        }
    }
}

impl fmt::Display for CommitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CommitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "feat" => Ok(Self::Feat),
            "fix" => Ok(Self::Fix),
            "docs" => Ok(Self::Docs),
            "style" => Ok(Self::Style),
            "refactor" => Ok(Self::Refactor),
            "test" => Ok(Self::Test),
            "chore" => Ok(Self::Chore),
            _ => Err(format!("Unknown commit type: {}", s)),
        }
    }
}

/// Where a message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSource {
    Api,
    Fallback,
}

/// A finished commit message: title, body and the `issue:` trailer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedMessage {
    pub title: String,
    pub body: String,
    pub commit_type: Option<CommitType>,
    pub issue: Option<IssueId>,
    pub source: MessageSource,
}

impl GeneratedMessage {
    /// Build a message from the text the model returned.
    ///
    /// The first non-empty line is the title. Any `issue:` lines the model put
    /// at the end are dropped; [`GeneratedMessage::format`] always writes the
    /// trailer from `issue` so it matches the branch.
    pub fn from_api_text(text: &str, issue: Option<IssueId>) -> Self {
        let mut lines: Vec<&str> = text.trim().lines().map(str::trim_end).collect();

        while let Some(last) = lines.last() {
            let last = last.trim();
            if last.is_empty() || is_issue_trailer(last) {
                lines.pop();
            } else {
                break;
            }
        }

        let title_idx = lines.iter().position(|l| !l.trim().is_empty());
        let (title, body) = match title_idx {
            Some(idx) => (
                lines[idx].trim().to_string(),
                lines[idx + 1..].join("\n").trim().to_string(),
            ),
            None => (String::new(), String::new()),
        };

        let commit_type = parse_commit_type(&title);

        Self {
            title,
            body,
            commit_type,
            issue,
            source: MessageSource::Api,
        }
    }

    /// The trailing line, `issue: <id>` or `issue: none`.
    pub fn trailer(&self) -> String {
        match &self.issue {
            Some(issue) => format!("issue: {issue}"),
            None => "issue: none".to_string(),
        }
    }

    /// Format the message for the commit-message file.
    ///
    /// Produces:
    /// ```text
    /// [CAM-1] feat: short title
    ///
    /// Body sentences.
    ///
    /// issue: CAM-1
    /// ```
    pub fn format(&self) -> String {
        let mut parts = vec![self.title.clone()];

        if !self.body.trim().is_empty() {
            parts.push(String::new());
            parts.push(self.body.trim().to_string());
        }

        parts.push(String::new());
        parts.push(self.trailer());

        parts.join("\n")
    }
}

impl fmt::Display for GeneratedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

fn is_issue_trailer(line: &str) -> bool {
    line.get(..6).is_some_and(|p| p.eq_ignore_ascii_case("issue:"))
}

/// Parse the type tag from a title such as `[CAM-1] fix(api): handle timeout`.
pub fn parse_commit_type(title: &str) -> Option<CommitType> {
    TITLE_RE
        .captures(title.trim())
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
