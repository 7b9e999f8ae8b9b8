//! Run configuration: volunteer identity, owner selection and credentials.

use std::fmt;

use crate::error::{Error, Result};

/// Preferred environment variable holding the API token.
pub const PRIMARY_TOKEN_VAR: &str = "GITHUB_TOKEN";

/// Legacy environment variable consulted when the primary one is unset.
pub const LEGACY_TOKEN_VAR: &str = "GH_TOKEN";

/// Prefix of every sandbox repository name.
pub const REPO_PREFIX: &str = "libelle-sandbox-";

/// Path of the welcome file committed to a new sandbox.
pub const README_PATH: &str = "README.md";

/// Commit message for the welcome file.
pub const README_COMMIT_MESSAGE: &str = "chore: add welcome README";

/// Permission granted to the volunteer.
pub const COLLABORATOR_PERMISSION: &str = "push";

/// A volunteer's account name, trimmed and guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volunteer(String);

impl Volunteer {
    /// Trims `raw` and rejects it if nothing is left.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::EmptyVolunteer);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// The trimmed account name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of this volunteer's sandbox repository.
    pub fn repo_name(&self) -> String {
        format!("{REPO_PREFIX}{}", self.0)
    }

    /// Body of the welcome README.
    pub fn readme(&self) -> String {
        format!(
            "# Welcome {}!\n\nThis sandbox repository was automatically created. Happy hacking 🚀\n",
            self.0
        )
    }
}

impl fmt::Display for Volunteer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which account should own the sandbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerSpec {
    /// A named organization.
    Organization(String),
    /// The account the token belongs to.
    AuthenticatedUser,
}

impl OwnerSpec {
    /// Builds the owner choice from an optional `--org` value.
    ///
    /// Blank names fall back to the authenticated user.
    pub fn from_org(org: Option<&str>) -> Self {
        match org.map(str::trim) {
            Some(name) if !name.is_empty() => Self::Organization(name.to_string()),
            _ => Self::AuthenticatedUser,
        }
    }
}

/// API credential. Never printed.
#[derive(Clone)]
pub struct Token(String);

impl Token {
    /// Raw token value, for the API client only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(<redacted>)")
    }
}

/// Reads the token from `lookup`, primary variable first. Empty values are skipped.
pub fn resolve_token<F>(lookup: F) -> Result<Token>
where
    F: Fn(&str) -> Option<String>,
{
    [PRIMARY_TOKEN_VAR, LEGACY_TOKEN_VAR]
        .into_iter()
        .filter_map(|var| lookup(var))
        .find(|value| !value.is_empty())
        .map(Token)
        .ok_or(Error::MissingToken)
}

/// Reads the token from the process environment.
pub fn token_from_env() -> Result<Token> {
    resolve_token(|var| std::env::var(var).ok())
}

/// Everything needed to provision one sandbox.
#[derive(Debug, Clone)]
pub struct SandboxRequest {
    pub volunteer: Volunteer,
    pub owner: OwnerSpec,
}

impl SandboxRequest {
    /// Validates the volunteer name and picks the owner from `org`.
    pub fn new(volunteer: &str, org: Option<&str>) -> Result<Self> {
        Ok(Self {
            volunteer: Volunteer::parse(volunteer)?,
            owner: OwnerSpec::from_org(org),
        })
    }

    /// Name of the sandbox repository to create.
    pub fn repo_name(&self) -> String {
        self.volunteer.repo_name()
    }
}
