//! Error types for sandbox provisioning.

use thiserror::Error;

/// Exit code for every fatal error.
pub const FATAL_EXIT_CODE: u8 = 2;

/// Error returned by a remote platform call.
///
/// Carries the HTTP status when the platform answered, so callers can tell
/// a missing resource apart from a transport or permission failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct PlatformError {
    /// HTTP status code, if the platform responded.
    pub status: Option<u16>,
    /// Underlying error text.
    pub message: String,
}

impl PlatformError {
    /// Creates an error without a status code.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// Creates an error for an HTTP response with the given status.
    pub fn with_status(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Returns true if the platform reported the resource as missing.
    pub fn is_not_found(&self) -> bool {
        self.status == Some(404)
    }
}

/// Fatal provisioning errors.
#[derive(Error, Debug)]
pub enum Error {
    /// The volunteer identifier was empty after trimming.
    #[error("volunteer username empty")]
    EmptyVolunteer,

    /// Neither token variable is set.
    #[error("no GitHub token found in env; set GITHUB_TOKEN (or the legacy GH_TOKEN)")]
    MissingToken,

    /// The API client could not be constructed.
    #[error("failed to build GitHub client: {0}")]
    Client(String),

    /// The requested organization could not be resolved.
    #[error("could not access organization '{org}': {source}")]
    Organization {
        org: String,
        #[source]
        source: PlatformError,
    },

    /// The authenticated user could not be resolved.
    #[error("could not get authenticated user: {0}")]
    AuthenticatedUser(#[source] PlatformError),

    /// Repository creation failed.
    #[error("failed to create repo '{name}': {source}")]
    CreateRepository {
        name: String,
        #[source]
        source: PlatformError,
    },
}

impl Error {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        FATAL_EXIT_CODE
    }
}

/// Result type alias for provisioning operations.
pub type Result<T> = std::result::Result<T, Error>;
