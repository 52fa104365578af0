use std::{env, path::PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use kubecreds::{exec::EXEC_INFO_ENV, fs::OsFileSystem, RestoreEngine, SecureEngine, UndoEngine};

mod keychain;
mod prompt;
mod summary;

use keychain::Keychain;
use prompt::TerminalPrompter;

const DEBUG_ENV: &str = "KUBECTL_CREDENTIALS_KEYCHAIN_DEBUG";

/// Kubernetes credentials helper that securely stores and retrieves cluster credentials.
///
/// Moves client certificates, keys and basic-auth out of your kubeconfig and into the
/// system keychain. Run without a subcommand, it acts as the exec-credential plugin kubectl
/// calls to get them back; credentials are never written to disk.
#[derive(Parser, Debug)]
#[command(name = "kubectl-credentials-keychain", version, about, long_about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// This makes your kubeconfig secure!
    Secure(Target),
    /// This makes your kubeconfig insecure!
    Undo(Target),
}

#[derive(Args, Debug)]
struct Target {
    /// Kubeconfig path
    #[arg(short = 'c', long)]
    kubeconfig: Option<PathBuf>,

    /// Only this user instead of all
    #[arg(short, long)]
    user: Option<String>,
}

fn init_logging() {
    let level = match env::var(DEBUG_ENV).as_deref() {
        Ok("true") => "debug",
        _ => "info",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout belongs to kubectl when running as a plugin.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn executable() -> anyhow::Result<PathBuf> {
    let exe = env::current_exe().context("Locating this executable")?;
    Ok(exe.canonicalize().unwrap_or(exe))
}

fn exec_credential() -> anyhow::Result<()> {
    let exec_info = env::var(EXEC_INFO_ENV).ok();
    debug!("{EXEC_INFO_ENV}: {:?}", exec_info);

    let store = Keychain;
    let answer = RestoreEngine { store: &store }
        .run(exec_info.as_deref())
        .context("Getting credentials for kubectl")?;

    println!("{}", answer.to_json()?);
    Ok(())
}

fn secure(target: Target) -> anyhow::Result<()> {
    let mut store = Keychain;
    let mut prompter = TerminalPrompter;
    let report = SecureEngine {
        fs: &OsFileSystem,
        store: &mut store,
        prompter: &mut prompter,
        executable: executable()?,
    }
    .run(target.kubeconfig.as_deref(), target.user.as_deref())
    .context("Securing kubeconfig")?;

    summary::print(&report);
    Ok(())
}

fn undo(target: Target) -> anyhow::Result<()> {
    let store = Keychain;
    let report = UndoEngine {
        fs: &OsFileSystem,
        store: &store,
        executable: executable()?,
    }
    .run(target.kubeconfig.as_deref(), target.user.as_deref())
    .context("Restoring kubeconfig")?;

    summary::print(&report);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging();
    debug!("kubectl-credentials-keychain initialized");

    match cli.command {
        None => exec_credential(),
        Some(Commands::Secure(target)) => secure(target),
        Some(Commands::Undo(target)) => undo(target),
    }
}
