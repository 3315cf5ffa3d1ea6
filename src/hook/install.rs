//! Installing, removing and inspecting the `prepare-commit-msg` hook.

use std::fs;
use std::path::{Path, PathBuf};

use git2::Repository;
use tracing::debug;

use crate::error::InstallError;

/// File name git looks for in the hooks directory.
pub const HOOK_NAME: &str = "prepare-commit-msg";

/// Second line of every script we write; identifies our hook.
const HOOK_MARKER: &str = "# hookscribe: prepare-commit-msg";

/// State of the `prepare-commit-msg` hook in a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookState {
    NotInstalled,
    Installed,
    /// Some other tool's hook occupies the slot.
    Foreign,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookStatus {
    pub hook_path: PathBuf,
    pub state: HookState,
}

/// Shell script that hands the hook arguments to `exe run`.
pub fn hook_script(exe: &Path) -> String {
    format!(
        "#!/bin/sh\n{HOOK_MARKER}\n# Installed by `hookscribe install`; remove with `hookscribe uninstall`.\nexec {} run \"$@\"\n",
        shell_quote(&exe.to_string_lossy())
    )
}

/// Path of the hook file for the repository containing `repo_path`.
///
/// Honors `core.hooksPath` (relative values resolve against the work tree).
pub fn hook_path(repo_path: &Path) -> Result<PathBuf, InstallError> {
    let repo = Repository::discover(repo_path)
        .map_err(|_| InstallError::NotARepository(repo_path.to_path_buf()))?;

    let configured = repo
        .config()
        .ok()
        .and_then(|cfg| cfg.get_path("core.hooksPath").ok());

    let hooks_dir = match configured {
        Some(dir) if dir.is_absolute() => dir,
        Some(dir) => repo.workdir().unwrap_or_else(|| repo.path()).join(dir),
        None => repo.path().join("hooks"),
    };

    Ok(hooks_dir.join(HOOK_NAME))
}

/// Inspect the hook slot.
pub fn status(repo_path: &Path) -> Result<HookStatus, InstallError> {
    let hook_path = hook_path(repo_path)?;
    let state = read_state(&hook_path)?;
    Ok(HookStatus { hook_path, state })
}

/// Write the hook script pointing at `exe`.
///
/// An existing hook of ours is refreshed. A foreign hook is only replaced
/// when `force` is set; otherwise [`InstallError::ForeignHook`] is returned.
pub fn install(repo_path: &Path, exe: &Path, force: bool) -> Result<PathBuf, InstallError> {
    let hook_path = hook_path(repo_path)?;

    if read_state(&hook_path)? == HookState::Foreign && !force {
        return Err(InstallError::ForeignHook(hook_path));
    }

    if let Some(dir) = hook_path.parent() {
        fs::create_dir_all(dir).map_err(|source| InstallError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    fs::write(&hook_path, hook_script(exe)).map_err(|source| InstallError::Io {
        path: hook_path.clone(),
        source,
    })?;
    make_executable(&hook_path)?;

    debug!("Installed hook at {}", hook_path.display());
    Ok(hook_path)
}

/// Remove our hook. Foreign hooks are left alone.
pub fn uninstall(repo_path: &Path) -> Result<PathBuf, InstallError> {
    let hook_path = hook_path(repo_path)?;

    match read_state(&hook_path)? {
        HookState::NotInstalled => Err(InstallError::HookNotFound(hook_path)),
        HookState::Foreign => Err(InstallError::ForeignHook(hook_path)),
        HookState::Installed => {
            fs::remove_file(&hook_path).map_err(|source| InstallError::Io {
                path: hook_path.clone(),
                source,
            })?;
            Ok(hook_path)
        }
    }
}

fn read_state(hook_path: &Path) -> Result<HookState, InstallError> {
    match fs::read(hook_path) {
        Ok(bytes) => {
            let content = String::from_utf8_lossy(&bytes);
            if content.lines().any(|l| l.trim() == HOOK_MARKER) {
                Ok(HookState::Installed)
            } else {
                Ok(HookState::Foreign)
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HookState::NotInstalled),
        Err(source) => Err(InstallError::Io {
            path: hook_path.to_path_buf(),
            source,
        }),
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<(), InstallError> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).map_err(|source| {
        InstallError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<(), InstallError> {
    Ok(())
}

/// Single-quote `s` for POSIX sh.
fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}
