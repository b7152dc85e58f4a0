#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod action;
mod config;
mod notify;
mod telemetry;

use std::process;
use std::sync::Arc;

use anyhow::Context;

use crate::config::Cli;
use crate::notify::ConsoleNotifier;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "pantau_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "pantau_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "pantau_cli::config";
pub const TRACING_TARGET_ACTION: &str = "pantau_cli::action";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::debug!(
            target: TRACING_TARGET_SHUTDOWN,
            "command completed successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %error,
            "command failed"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    telemetry::init_tracing()?;
    tracing::debug!(
        target: TRACING_TARGET_STARTUP,
        command = ?cli.command,
        "starting pantau"
    );

    cli.log();
    cli.validate()?;

    let notifier = Arc::new(ConsoleNotifier::new());
    action::execute(&cli, notifier.clone())
        .await
        .context("command failed")?;

    if notifier.failed() {
        anyhow::bail!("command reported an error");
    }

    Ok(())
}
