//! Provisions private `libelle-sandbox-<volunteer>` repositories on GitHub.
//!
//! The flow lives in [`provision::SandboxProvisioner`], which talks to the
//! hosting service only through the [`platform::Platform`] trait.
//! [`github::GitHub`] is the production implementation.

pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod platform;
pub mod provision;

use crate::cli::Args;
use crate::config::SandboxRequest;
use crate::error::Result;
use crate::github::GitHub;
use crate::provision::{Outcome, SandboxProvisioner};

/// Validates input, reads the token and provisions the sandbox.
///
/// Input and credential errors are returned before any remote call is made.
pub async fn run(args: &Args) -> Result<Outcome> {
    let request = SandboxRequest::new(&args.volunteer, args.org.as_deref())?;
    let token = config::token_from_env()?;
    let github = GitHub::new(&token, args.api_url.as_deref())?;

    SandboxProvisioner::new(github).provision(&request).await
}
