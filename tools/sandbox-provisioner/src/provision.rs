//! Sandbox provisioning flow.
//!
//! Steps run strictly in order:
//!
//! 1. resolve the owner (organization or authenticated user)
//! 2. stop early if `libelle-sandbox-<volunteer>` already exists
//! 3. create the private repository
//! 4. commit the welcome README (warning on failure)
//! 5. invite the volunteer with push access (warning on failure)

use tracing::{info, warn};

use crate::config::{
    OwnerSpec, SandboxRequest, COLLABORATOR_PERMISSION, README_COMMIT_MESSAGE, README_PATH,
};
use crate::error::{Error, Result};
use crate::platform::{NewFile, NewRepository, Owner, OwnerKind, Platform, Repository};

/// How a provisioning run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The sandbox was already there; nothing was changed.
    AlreadyExists { repository: Repository },
    /// A new sandbox was created.
    Created {
        repository: Repository,
        readme_added: bool,
        collaborator_invited: bool,
    },
}

impl Outcome {
    /// The sandbox repository, whether new or pre-existing.
    pub fn repository(&self) -> &Repository {
        match self {
            Self::AlreadyExists { repository } | Self::Created { repository, .. } => repository,
        }
    }

    /// Final status line, noting any step that degraded to a warning.
    pub fn summary(&self) -> String {
        match self {
            Self::AlreadyExists { repository } => {
                format!("Sandbox repo already exists: {}", repository.full_name())
            }
            Self::Created {
                repository,
                readme_added,
                collaborator_invited,
            } => {
                let mut notes = Vec::new();
                if !readme_added {
                    notes.push("README not added");
                }
                if !collaborator_invited {
                    notes.push("invite failed");
                }
                let mut line = format!("✅ Sandbox repo created: {}", repository.full_name());
                if !notes.is_empty() {
                    line.push_str(&format!(" ({})", notes.join(", ")));
                }
                line
            }
        }
    }
}

/// Creates volunteer sandboxes on a [`Platform`].
pub struct SandboxProvisioner<P> {
    platform: P,
}

impl<P: Platform> SandboxProvisioner<P> {
    /// Wraps the platform client.
    pub fn new(platform: P) -> Self {
        Self { platform }
    }

    /// Runs the full flow for one volunteer.
    pub async fn provision(&self, request: &SandboxRequest) -> Result<Outcome> {
        let owner = self.resolve_owner(&request.owner).await?;

        let repo_name = request.repo_name();
        info!("target repo name = {repo_name}");

        match self.platform.repository(&owner, &repo_name).await {
            Ok(Some(existing)) => {
                info!(
                    "repo '{repo_name}' already exists at {}",
                    existing.display_url()
                );
                return Ok(Outcome::AlreadyExists {
                    repository: existing,
                });
            }
            Ok(None) => {}
            Err(e) => warn!("could not check for existing repo '{repo_name}': {e}"),
        }

        let new_repo = NewRepository {
            name: repo_name.clone(),
            private: true,
            auto_init: true,
        };
        let repository = self
            .platform
            .create_repository(&owner, &new_repo)
            .await
            .map_err(|source| Error::CreateRepository {
                name: repo_name,
                source,
            })?;
        info!(
            "created repo: {} ({})",
            repository.full_name(),
            repository.display_url()
        );

        let readme = NewFile {
            path: README_PATH.to_string(),
            message: README_COMMIT_MESSAGE.to_string(),
            content: request.volunteer.readme(),
        };
        let readme_added = match self.platform.create_file(&repository, &readme).await {
            Ok(()) => {
                info!("added {README_PATH}");
                true
            }
            Err(e) => {
                warn!("couldn't create {README_PATH} (maybe exists): {e}");
                false
            }
        };

        let volunteer = request.volunteer.as_str();
        let collaborator_invited = match self
            .platform
            .add_collaborator(&repository, volunteer, COLLABORATOR_PERMISSION)
            .await
        {
            Ok(()) => {
                info!("invited collaborator: {volunteer}");
                true
            }
            Err(e) => {
                warn!("could not add collaborator '{volunteer}': {e}");
                false
            }
        };

        Ok(Outcome::Created {
            repository,
            readme_added,
            collaborator_invited,
        })
    }

    async fn resolve_owner(&self, spec: &OwnerSpec) -> Result<Owner> {
        let owner = match spec {
            OwnerSpec::Organization(org) => {
                self.platform
                    .organization(org)
                    .await
                    .map_err(|source| Error::Organization {
                        org: org.clone(),
                        source,
                    })?
            }
            OwnerSpec::AuthenticatedUser => self
                .platform
                .authenticated_user()
                .await
                .map_err(Error::AuthenticatedUser)?,
        };
        match owner.kind {
            OwnerKind::Organization => info!("using organization '{}' as owner", owner.login),
            OwnerKind::User => info!("using authenticated user '{}' as owner", owner.login),
        }
        Ok(owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlatformError;
    use crate::platform::PlatformResult;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// A remote call observed by [`RecordingPlatform`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Organization(String),
        AuthenticatedUser,
        Repository(String, String),
        CreateRepository(String, NewRepository),
        CreateFile(String, NewFile),
        AddCollaborator(String, String, String),
    }

    /// In-memory platform that records calls and fails on demand.
    #[derive(Default)]
    pub struct RecordingPlatform {
        pub calls: Mutex<Vec<Call>>,
        pub user: String,
        pub orgs: Vec<String>,
        pub existing: Vec<String>,
        pub fail_lookup: bool,
        pub fail_create: bool,
        pub fail_file: bool,
        pub fail_collaborator: bool,
    }

    impl RecordingPlatform {
        pub fn new() -> Self {
            Self {
                user: "libelle-bot".to_string(),
                ..Self::default()
            }
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Platform for RecordingPlatform {
        async fn organization(&self, name: &str) -> PlatformResult<Owner> {
            self.record(Call::Organization(name.to_string()));
            if self.orgs.iter().any(|o| o == name) {
                Ok(Owner::organization(name))
            } else {
                Err(PlatformError::with_status(404, "Not Found"))
            }
        }

        async fn authenticated_user(&self) -> PlatformResult<Owner> {
            self.record(Call::AuthenticatedUser);
            Ok(Owner::user(self.user.clone()))
        }

        async fn repository(
            &self,
            owner: &Owner,
            name: &str,
        ) -> PlatformResult<Option<Repository>> {
            self.record(Call::Repository(owner.login.clone(), name.to_string()));
            if self.fail_lookup {
                return Err(PlatformError::with_status(502, "Bad Gateway"));
            }
            Ok(self.existing.iter().any(|e| e == name).then(|| Repository {
                owner: owner.login.clone(),
                name: name.to_string(),
                html_url: Some(format!("https://github.com/{}/{name}", owner.login)),
            }))
        }

        async fn create_repository(
            &self,
            owner: &Owner,
            repo: &NewRepository,
        ) -> PlatformResult<Repository> {
            self.record(Call::CreateRepository(owner.login.clone(), repo.clone()));
            if self.fail_create {
                return Err(PlatformError::with_status(422, "Repository creation failed."));
            }
            Ok(Repository {
                owner: owner.login.clone(),
                name: repo.name.clone(),
                html_url: None,
            })
        }

        async fn create_file(&self, repo: &Repository, file: &NewFile) -> PlatformResult<()> {
            self.record(Call::CreateFile(repo.full_name(), file.clone()));
            if self.fail_file {
                return Err(PlatformError::with_status(422, "sha wasn't supplied"));
            }
            Ok(())
        }

        async fn add_collaborator(
            &self,
            repo: &Repository,
            login: &str,
            permission: &str,
        ) -> PlatformResult<()> {
            self.record(Call::AddCollaborator(
                repo.full_name(),
                login.to_string(),
                permission.to_string(),
            ));
            if self.fail_collaborator {
                return Err(PlatformError::with_status(404, "Not Found"));
            }
            Ok(())
        }
    }

    fn request(volunteer: &str, org: Option<&str>) -> SandboxRequest {
        SandboxRequest::new(volunteer, org).unwrap()
    }

    #[tokio::test]
    async fn creates_sandbox_for_authenticated_user() {
        let provisioner = SandboxProvisioner::new(RecordingPlatform::new());

        let outcome = provisioner
            .provision(&request("zoya1257", None))
            .await
            .unwrap();

        let repo = outcome.repository().clone();
        assert_eq!(repo.full_name(), "libelle-bot/libelle-sandbox-zoya1257");
        assert_eq!(
            outcome,
            Outcome::Created {
                repository: repo,
                readme_added: true,
                collaborator_invited: true,
            }
        );

        let calls = provisioner.platform.calls();
        assert_eq!(calls.len(), 5);
        assert_eq!(calls[0], Call::AuthenticatedUser);
        assert_eq!(
            calls[1],
            Call::Repository(
                "libelle-bot".to_string(),
                "libelle-sandbox-zoya1257".to_string()
            )
        );
        assert_eq!(
            calls[2],
            Call::CreateRepository(
                "libelle-bot".to_string(),
                NewRepository {
                    name: "libelle-sandbox-zoya1257".to_string(),
                    private: true,
                    auto_init: true,
                }
            )
        );
        match &calls[3] {
            Call::CreateFile(repo, file) => {
                assert_eq!(repo, "libelle-bot/libelle-sandbox-zoya1257");
                assert_eq!(file.path, "README.md");
                assert_eq!(file.message, "chore: add welcome README");
                assert!(file.content.contains("Welcome zoya1257"));
            }
            other => panic!("expected CreateFile, got {other:?}"),
        }
        assert_eq!(
            calls[4],
            Call::AddCollaborator(
                "libelle-bot/libelle-sandbox-zoya1257".to_string(),
                "zoya1257".to_string(),
                "push".to_string()
            )
        );
    }

    #[tokio::test]
    async fn uses_organization_when_given() {
        let platform = RecordingPlatform {
            orgs: vec!["libelle".to_string()],
            ..RecordingPlatform::new()
        };
        let provisioner = SandboxProvisioner::new(platform);

        let outcome = provisioner
            .provision(&request("zoya1257", Some("libelle")))
            .await
            .unwrap();

        assert_eq!(
            outcome.repository().full_name(),
            "libelle/libelle-sandbox-zoya1257"
        );
        let calls = provisioner.platform.calls();
        assert_eq!(calls[0], Call::Organization("libelle".to_string()));
        assert!(!calls.contains(&Call::AuthenticatedUser));
    }

    #[tokio::test]
    async fn unknown_organization_is_fatal() {
        let provisioner = SandboxProvisioner::new(RecordingPlatform::new());

        let err = provisioner
            .provision(&request("zoya1257", Some("nope")))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Organization { ref org, .. } if org == "nope"));
        assert_eq!(err.exit_code(), 2);
        assert_eq!(
            provisioner.platform.calls(),
            vec![Call::Organization("nope".to_string())]
        );
    }

    #[tokio::test]
    async fn existing_repository_is_success_without_changes() {
        let platform = RecordingPlatform {
            existing: vec!["libelle-sandbox-zoya1257".to_string()],
            ..RecordingPlatform::new()
        };
        let provisioner = SandboxProvisioner::new(platform);

        let outcome = provisioner
            .provision(&request("zoya1257", None))
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::AlreadyExists { .. }));
        let calls = provisioner.platform.calls();
        assert_eq!(calls.len(), 2);
        assert!(!calls.iter().any(|c| matches!(
            c,
            Call::CreateRepository(..) | Call::CreateFile(..) | Call::AddCollaborator(..)
        )));
    }

    #[tokio::test]
    async fn readme_failure_still_invites() {
        let platform = RecordingPlatform {
            fail_file: true,
            ..RecordingPlatform::new()
        };
        let provisioner = SandboxProvisioner::new(platform);

        let outcome = provisioner
            .provision(&request("zoya1257", None))
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            Outcome::Created {
                readme_added: false,
                collaborator_invited: true,
                ..
            }
        ));
        assert!(matches!(
            provisioner.platform.calls().last(),
            Some(Call::AddCollaborator(..))
        ));
    }

    #[tokio::test]
    async fn collaborator_failure_is_warning() {
        let platform = RecordingPlatform {
            fail_file: true,
            fail_collaborator: true,
            ..RecordingPlatform::new()
        };
        let provisioner = SandboxProvisioner::new(platform);

        let outcome = provisioner
            .provision(&request("zoya1257", None))
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            Outcome::Created {
                readme_added: false,
                collaborator_invited: false,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn create_failure_is_fatal_and_stops() {
        let platform = RecordingPlatform {
            fail_create: true,
            ..RecordingPlatform::new()
        };
        let provisioner = SandboxProvisioner::new(platform);

        let err = provisioner
            .provision(&request("zoya1257", None))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::CreateRepository { ref name, .. } if name == "libelle-sandbox-zoya1257"));
        assert!(err.to_string().contains("Repository creation failed."));
        let calls = provisioner.platform.calls();
        assert!(matches!(calls.last(), Some(Call::CreateRepository(..))));
    }

    #[tokio::test]
    async fn lookup_failure_falls_through_to_create() {
        let platform = RecordingPlatform {
            fail_lookup: true,
            ..RecordingPlatform::new()
        };
        let provisioner = SandboxProvisioner::new(platform);

        let outcome = provisioner
            .provision(&request("zoya1257", None))
            .await
            .unwrap();

        assert!(matches!(outcome, Outcome::Created { .. }));
        assert!(provisioner
            .platform
            .calls()
            .iter()
            .any(|c| matches!(c, Call::CreateRepository(..))));
    }

    fn created(readme_added: bool, collaborator_invited: bool) -> Outcome {
        Outcome::Created {
            repository: Repository {
                owner: "libelle".to_string(),
                name: "libelle-sandbox-zoya1257".to_string(),
                html_url: None,
            },
            readme_added,
            collaborator_invited,
        }
    }

    #[test]
    fn summary_reports_clean_run() {
        assert_eq!(
            created(true, true).summary(),
            "✅ Sandbox repo created: libelle/libelle-sandbox-zoya1257"
        );
    }

    #[test]
    fn summary_notes_degraded_steps() {
        assert_eq!(
            created(true, false).summary(),
            "✅ Sandbox repo created: libelle/libelle-sandbox-zoya1257 (invite failed)"
        );
        assert_eq!(
            created(false, false).summary(),
            "✅ Sandbox repo created: libelle/libelle-sandbox-zoya1257 (README not added, invite failed)"
        );
    }

    #[test]
    fn summary_for_existing_repo() {
        let outcome = Outcome::AlreadyExists {
            repository: Repository {
                owner: "libelle".to_string(),
                name: "libelle-sandbox-zoya1257".to_string(),
                html_url: None,
            },
        };
        assert_eq!(
            outcome.summary(),
            "Sandbox repo already exists: libelle/libelle-sandbox-zoya1257"
        );
    }
}
