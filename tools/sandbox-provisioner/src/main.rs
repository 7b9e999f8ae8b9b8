//! Sandbox Provisioner - Volunteer Onboarding
//!
//! Creates a private `libelle-sandbox-<volunteer>` repository, commits a
//! welcome README and invites the volunteer with push access.
//!
//! # Usage
//!
//! ```bash
//! # Under the account that owns the token
//! GITHUB_TOKEN=ghp_... sandbox-provisioner zoya1257
//!
//! # Under an organization
//! GITHUB_TOKEN=ghp_... sandbox-provisioner zoya1257 --org libelle
//! ```
//!
//! # Exit Codes
//!
//! - `0` - sandbox created, or it already existed
//! - `2` - missing input or token, unknown owner, or repository creation failed

use std::process::ExitCode;

use clap::Parser;
use sandbox_provisioner::cli::Args;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_env("SANDBOX_PROVISIONER_LOG").unwrap_or_else(|_| {
        if args.verbose {
            EnvFilter::new("info,sandbox_provisioner=debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match sandbox_provisioner::run(&args).await {
        Ok(outcome) => {
            println!("{}", outcome.summary());
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::from(e.exit_code())
        }
    }
}
