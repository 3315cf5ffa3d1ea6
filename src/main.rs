//! hookscribe - CLI entry point.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dialoguer::Confirm;
use tracing_subscriber::EnvFilter;

use hookscribe::hook::{self, HookState};
use hookscribe::{ApiConfig, InstallError, MessageGenerator};

/// Write commit messages from the staged diff using Claude.
#[derive(Parser, Debug)]
#[command(name = "hookscribe")]
#[command(about = "Write commit messages from the staged diff using Claude")]
#[command(version)]
struct Cli {
    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run as the prepare-commit-msg hook (invoked by git)
    Run {
        /// Commit message file git asks the hook to fill
        message_file: PathBuf,

        /// Message source passed by git (message, template, merge, squash, commit)
        source: Option<String>,

        /// Commit SHA passed by git when amending
        sha: Option<String>,

        /// Model to request (overrides HOOKSCRIBE_MODEL)
        #[arg(long)]
        model: Option<String>,

        /// Request timeout in seconds (overrides HOOKSCRIBE_TIMEOUT)
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Install the prepare-commit-msg hook in the current repository
    Install {
        /// Replace a prepare-commit-msg hook not written by hookscribe
        #[arg(long)]
        force: bool,
    },

    /// Remove the hook installed by hookscribe
    Uninstall,

    /// Show whether the hook is installed and an API key is configured
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Run {
            message_file,
            source,
            sha,
            model,
            timeout,
        } => run(message_file, source, sha, model, timeout).await,
        Command::Install { force } => install(force),
        Command::Uninstall => uninstall(),
        Command::Status => status(),
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("hookscribe=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

async fn run(
    message_file: PathBuf,
    source: Option<String>,
    sha: Option<String>,
    model: Option<String>,
    timeout: Option<u64>,
) -> Result<()> {
    tracing::debug!("Hook invoked: source={:?} sha={:?}", source, sha);

    let mut config = ApiConfig::from_env();
    if let Some(model) = model {
        config = config.with_model(model);
    }
    if let Some(secs) = timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    let generator = MessageGenerator::new(config);
    hook::run_hook(Path::new("."), &message_file, &generator)
        .await
        .context("Failed to generate commit message")?;

    Ok(())
}

fn install(force: bool) -> Result<()> {
    let exe = std::env::current_exe().context("Could not locate the hookscribe executable")?;

    let path = match hook::install(Path::new("."), &exe, force) {
        Ok(path) => path,
        Err(InstallError::ForeignHook(path)) if std::io::stdin().is_terminal() => {
            let replace = Confirm::new()
                .with_prompt(format!(
                    "{} already exists and was not written by hookscribe. Replace it?",
                    path.display()
                ))
                .default(false)
                .interact()
                .map_err(|e| InstallError::PromptFailed(e.to_string()))?;
            if !replace {
                return Err(InstallError::Cancelled.into());
            }
            hook::install(Path::new("."), &exe, true)?
        }
        Err(e) => return Err(e.into()),
    };

    println!("✓ Hook installed at {}", path.display());
    println!("To use the hook:");
    println!("   1. Set your API key: export CLAUDE_API_KEY=\"your-key-here\"");
    println!("   2. Get your API key from: https://console.anthropic.com/");
    println!("   3. Use: git add . && git commit");
    Ok(())
}

fn uninstall() -> Result<()> {
    let path = hook::uninstall(Path::new(".")).context("Failed to uninstall hook")?;
    println!("✓ Hook removed from {}", path.display());
    Ok(())
}

fn status() -> Result<()> {
    println!("Checking hookscribe status...");

    let status = match hook::status(Path::new(".")) {
        Ok(status) => status,
        Err(InstallError::NotARepository(_)) => {
            println!("  [WARN] Not in a git repository");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    match status.state {
        HookState::Installed => {
            println!("  [PASS] Hook installed at {}", status.hook_path.display())
        }
        HookState::NotInstalled => {
            println!("  [FAIL] Hook not installed (run: hookscribe install)")
        }
        HookState::Foreign => println!(
            "  [WARN] {} exists but was not written by hookscribe",
            status.hook_path.display()
        ),
    }

    if ApiConfig::from_env().api_key().is_some() {
        println!("  [PASS] CLAUDE_API_KEY is set");
    } else {
        println!("  [WARN] CLAUDE_API_KEY is not set; commits will use the fallback message");
    }

    Ok(())
}
