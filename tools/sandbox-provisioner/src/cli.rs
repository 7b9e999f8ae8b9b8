//! Command-line arguments.

use clap::Parser;

/// Creates a private sandbox repository for a volunteer and invites them.
#[derive(Parser, Debug, Clone)]
#[command(name = "sandbox-provisioner")]
#[command(about = "Creates a libelle-sandbox-<volunteer> repository and invites the volunteer")]
#[command(version)]
pub struct Args {
    /// Volunteer GitHub username (e.g. zoya1257).
    pub volunteer: String,

    /// Organization to own the repository. Defaults to the authenticated user.
    #[arg(long, env = "SANDBOX_PROVISIONER_ORG")]
    pub org: Option<String>,

    /// GitHub API base URL, for GitHub Enterprise Server.
    #[arg(long, env = "GITHUB_API_URL")]
    pub api_url: Option<String>,

    /// Enable debug logging.
    #[arg(short, long)]
    pub verbose: bool,
}
