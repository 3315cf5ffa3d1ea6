//! Reading the staged diff and branch name from a repository using git2.

use git2::{DiffFormat, ErrorCode, Repository, Tree};
use tracing::warn;

use crate::error::HookError;

/// Resolve the HEAD tree, distinguishing empty-repo errors from real failures.
///
/// Returns `Ok(None)` for repos with no commits (unborn branch / not found),
/// `Ok(Some(tree))` for repos with a valid HEAD, or `Err(HookError::DiffFailed)`
/// for real errors (corrupt HEAD, permission issues, missing objects).
fn resolve_head_tree(repo: &Repository) -> Result<Option<Tree<'_>>, HookError> {
    let head_ref = match repo.head() {
        Ok(r) => r,
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
            return Ok(None);
        }
        Err(e) => return Err(HookError::DiffFailed(e)),
    };

    let tree = head_ref.peel_to_tree().map_err(HookError::DiffFailed)?;
    Ok(Some(tree))
}

/// Unified patch text of the index against HEAD, like `git diff --cached --no-color`.
///
/// Returns an empty string when nothing is staged.
pub fn read_staged_diff(repo: &Repository) -> Result<String, HookError> {
    let head_tree = resolve_head_tree(repo)?;

    let diff = repo
        .diff_tree_to_index(head_tree.as_ref(), None, None)
        .map_err(HookError::DiffFailed)?;

    let mut text = String::new();
    diff.print(DiffFormat::Patch, |_delta, _hunk, line| {
        let origin = line.origin();
        if origin == '+' || origin == '-' || origin == ' ' {
            text.push(origin);
        }
        match std::str::from_utf8(line.content()) {
            Ok(content) => text.push_str(content),
            Err(_) => text.push_str(&String::from_utf8_lossy(line.content())),
        }
        true
    })
    .map_err(HookError::DiffFailed)?;

    Ok(text)
}

/// Current branch name, like `git rev-parse --abbrev-ref HEAD`.
///
/// Detached HEAD yields `HEAD`. An unborn branch yields the name HEAD points at.
pub fn current_branch(repo: &Repository) -> String {
    match repo.head() {
        Ok(head) if head.is_branch() => head.shorthand().unwrap_or("HEAD").to_string(),
        Ok(_) => "HEAD".to_string(),
        Err(e) => {
            if e.code() != ErrorCode::UnbornBranch && e.code() != ErrorCode::NotFound {
                warn!("Could not resolve HEAD: {e}");
            }
            repo.find_reference("HEAD")
                .ok()
                .and_then(|r| r.symbolic_target().map(str::to_string))
                .map(|target| target.trim_start_matches("refs/heads/").to_string())
                .unwrap_or_else(|| "HEAD".to_string())
        }
    }
}
