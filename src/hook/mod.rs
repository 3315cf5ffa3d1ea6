//! Git hook integration: the hook entry point and its installer.

pub mod install;
pub mod run;

pub use install::{HOOK_NAME, HookState, HookStatus, hook_path, install, status, uninstall};
pub use run::{run_hook, write_message};
