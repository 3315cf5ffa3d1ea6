//! `prepare-commit-msg` entry point.

use std::io::Write;
use std::path::Path;

use git2::{Index, Repository};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::diff::{current_branch, read_staged_diff};
use crate::error::HookError;
use crate::generator::{Generation, MessageGenerator};

/// Generate a message for the staged changes of the repository containing
/// `repo_path` and write it to `message_file`.
///
/// Returns `Ok(None)` when nothing is staged; the message file is left
/// untouched in that case.
pub async fn run_hook(
    repo_path: &Path,
    message_file: &Path,
    generator: &MessageGenerator,
) -> Result<Option<Generation>, HookError> {
    let repo = open_repository(repo_path)?;

    let diff = read_staged_diff(&repo)?;
    if diff.trim().is_empty() {
        println!("No staged changes for commit");
        return Ok(None);
    }

    println!("🔍 Analyzing changes with Claude...");
    let branch = current_branch(&repo);
    println!("📋 Branch: {}", branch);

    let generation = generator.generate(&diff, &branch).await?;

    if let Some(reason) = generation.fallback_reason() {
        println!("⚠️  Claude API unavailable, generating basic message...");
        if reason.is_configuration() {
            println!("   {}", reason);
        }
    }

    let message = generation.message();
    debug!(
        "Using {:?} message, type {}",
        message.source,
        message
            .commit_type
            .map(|t| t.as_str())
            .unwrap_or("unrecognised")
    );

    let formatted = message.format();
    write_message(message_file, &formatted)?;
    debug!("Wrote {} bytes to {}", formatted.len() + 1, message_file.display());

    println!("✅ Commit message generated:");
    for line in formatted.lines() {
        println!("   {}", line);
    }

    Ok(Some(generation))
}

/// Open the repository the hook runs for.
///
/// Git exports `GIT_DIR` to hooks and, for `commit -a`, `commit <paths>` and
/// `commit -i/-o`, a temporary `GIT_INDEX_FILE`. Both are honored so the diff
/// matches `git diff --cached`. Without `GIT_DIR` the repository is
/// discovered from `repo_path`.
fn open_repository(repo_path: &Path) -> Result<Repository, HookError> {
    let repo = if std::env::var_os("GIT_DIR").is_some() {
        Repository::open_from_env()
    } else {
        Repository::discover(repo_path)
    }
    .map_err(HookError::OpenRepository)?;

    if let Some(index_file) = std::env::var_os("GIT_INDEX_FILE") {
        debug!("Using index from GIT_INDEX_FILE: {:?}", index_file);
        let mut index = Index::open(Path::new(&index_file)).map_err(HookError::OpenRepository)?;
        repo.set_index(&mut index).map_err(HookError::OpenRepository)?;
    }

    Ok(repo)
}

/// Replace `path` with `message` plus a trailing newline.
///
/// Written to a temp file in the same directory and renamed over the target,
/// so git never reads a half-written message.
pub fn write_message(path: &Path, message: &str) -> Result<(), HookError> {
    let write_err = |source: std::io::Error| HookError::WriteMessage {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(write_err)?;
    file.write_all(message.as_bytes()).map_err(write_err)?;
    file.write_all(b"\n").map_err(write_err)?;
    file.persist(path).map_err(|e| write_err(e.error))?;

    Ok(())
}
