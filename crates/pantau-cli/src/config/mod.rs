//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── client: ReqwestConfig   # API base URL, token, timeout
//! ├── session: SessionConfig  # Acting user and posting policy
//! └── command: Command        # What to do
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! # List the comments of a proposal
//! pantau --api-base-url https://pantau.example.go.id list usulan 42
//!
//! # Or via environment variables
//! API_BASE_URL=https://pantau.example.go.id API_TOKEN=... pantau like usulan 42 7 \
//!     --username budi --biografi-id 7
//! ```

mod command;
mod session;

use std::process;

use anyhow::Context;
use clap::Parser;
pub use command::{Command, DraftArgs, Target};
use pantau_comment::reqwest::ReqwestConfig;
pub use session::SessionConfig;

use crate::TRACING_TARGET_CONFIG;

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "pantau")]
#[command(about = "Read and post comments on pantau resources")]
#[command(version)]
pub struct Cli {
    /// Comment API connection.
    #[clap(flatten)]
    pub client: ReqwestConfig,

    /// Acting user.
    #[clap(flatten)]
    pub session: SessionConfig,

    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// The .env file is loaded before clap parses arguments, so its values
    /// can back the `env` defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.client
            .validate()
            .context("invalid API client configuration")?;
        Ok(())
    }

    /// Logs configuration at debug level (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            features = ?Self::enabled_features(),
            "Build information"
        );

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            api_base_url = %self.client.api_base_url,
            asset_base_url = ?self.client.asset_base_url.as_ref().map(|url| url.as_str()),
            http_timeout_secs = self.client.http_timeout,
            has_api_token = self.client.api_token.is_some(),
            "API client configuration"
        );

        self.session.log();
    }

    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pantau_comment::ResourceType;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_reply() {
        let cli = Cli::try_parse_from([
            "pantau",
            "--api-base-url",
            "https://pantau.example.go.id",
            "--username",
            "budi",
            "--biografi-id",
            "7",
            "reply",
            "pelaksanaan",
            "3",
            "5",
            "--konten",
            "Setuju",
        ])
        .unwrap();

        assert_eq!(cli.client.api_base_url.host_str(), Some("pantau.example.go.id"));
        assert_eq!(cli.session.biografi_id, Some(7));
        let Command::Reply {
            target,
            parent_id,
            draft,
        } = &cli.command
        else {
            panic!("expected reply, got {:?}", cli.command);
        };
        assert_eq!(target.resource, ResourceType::Pelaksanaan);
        assert_eq!(target.id, 3);
        assert_eq!(*parent_id, 5);
        assert_eq!(draft.konten, "Setuju");
        assert!(draft.nama.is_none());
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_unknown_resource_is_rejected() {
        let parsed = Cli::try_parse_from(["pantau", "list", "artikel", "1"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_biografi_requires_username() {
        let parsed = Cli::try_parse_from(["pantau", "--biografi-id", "7", "like", "berita", "1", "2"]);
        assert!(parsed.is_err());
    }
}
