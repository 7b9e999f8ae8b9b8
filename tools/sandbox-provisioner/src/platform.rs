//! Remote operations the provisioner consumes from the hosting platform.

use async_trait::async_trait;

use crate::error::PlatformError;

/// Result type for platform calls.
pub type PlatformResult<T> = std::result::Result<T, PlatformError>;

/// Kind of account owning a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerKind {
    Organization,
    User,
}

/// A resolved owning account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub kind: OwnerKind,
    pub login: String,
}

impl Owner {
    pub fn organization(login: impl Into<String>) -> Self {
        Self {
            kind: OwnerKind::Organization,
            login: login.into(),
        }
    }

    pub fn user(login: impl Into<String>) -> Self {
        Self {
            kind: OwnerKind::User,
            login: login.into(),
        }
    }
}

/// Handle to a remote repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Owner login.
    pub owner: String,
    /// Repository name.
    pub name: String,
    /// Browser URL, when the platform reports one.
    pub html_url: Option<String>,
}

impl Repository {
    /// `owner/name`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// URL if known, otherwise the full name.
    pub fn display_url(&self) -> String {
        self.html_url.clone().unwrap_or_else(|| self.full_name())
    }
}

/// Parameters for a new repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRepository {
    pub name: String,
    pub private: bool,
    pub auto_init: bool,
}

/// A file to commit to a repository's default branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFile {
    pub path: String,
    pub message: String,
    pub content: String,
}

/// Hosting platform API.
///
/// Each call is a single remote request; implementations must not retry.
#[async_trait]
pub trait Platform: Send + Sync {
    /// Looks up an organization by name.
    async fn organization(&self, name: &str) -> PlatformResult<Owner>;

    /// Returns the account the credential belongs to.
    async fn authenticated_user(&self) -> PlatformResult<Owner>;

    /// Looks up a repository; `Ok(None)` when it does not exist.
    async fn repository(&self, owner: &Owner, name: &str) -> PlatformResult<Option<Repository>>;

    /// Creates a repository under `owner`.
    async fn create_repository(
        &self,
        owner: &Owner,
        repo: &NewRepository,
    ) -> PlatformResult<Repository>;

    /// Commits a new file.
    async fn create_file(&self, repo: &Repository, file: &NewFile) -> PlatformResult<()>;

    /// Invites `login` as a collaborator with `permission`.
    async fn add_collaborator(
        &self,
        repo: &Repository,
        login: &str,
        permission: &str,
    ) -> PlatformResult<()>;
}
