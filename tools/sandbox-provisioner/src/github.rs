//! GitHub implementation of [`Platform`] backed by `octocrab`.

use async_trait::async_trait;
use octocrab::{models, Octocrab};
use serde::Serialize;
use tracing::debug;

use crate::config::Token;
use crate::error::{Error, PlatformError, Result};
use crate::platform::{
    NewFile, NewRepository, Owner, OwnerKind, Platform, PlatformResult, Repository,
};

/// Body of `POST /orgs/{org}/repos` and `POST /user/repos`.
#[derive(Debug, Serialize)]
struct CreateRepositoryBody<'a> {
    name: &'a str,
    private: bool,
    auto_init: bool,
}

/// Body of `PUT /repos/{owner}/{repo}/collaborators/{login}`.
#[derive(Debug, Serialize)]
struct CollaboratorBody<'a> {
    permission: &'a str,
}

impl From<octocrab::Error> for PlatformError {
    fn from(err: octocrab::Error) -> Self {
        match &err {
            octocrab::Error::GitHub { source, .. } => {
                let mut message = source.message.clone();
                if let Some(errors) = source.errors.as_ref().filter(|e| !e.is_empty()) {
                    let detail = serde_json::to_string(errors).unwrap_or_default();
                    message = format!("{message} {detail}");
                }
                PlatformError::with_status(source.status_code.as_u16(), message)
            }
            _ => PlatformError::new(err.to_string()),
        }
    }
}

/// GitHub REST client.
pub struct GitHub {
    client: Octocrab,
}

impl GitHub {
    /// Builds an authenticated client.
    ///
    /// `api_url` overrides the default `https://api.github.com`, e.g. for
    /// GitHub Enterprise Server.
    pub fn new(token: &Token, api_url: Option<&str>) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token.expose().to_string());
        if let Some(url) = api_url {
            builder = builder
                .base_uri(url)
                .map_err(|e| Error::Client(format!("invalid API URL '{url}': {e}")))?;
        }
        let client = builder.build().map_err(|e| Error::Client(e.to_string()))?;
        Ok(Self { client })
    }

    fn to_repository(model: models::Repository, fallback_owner: &str) -> Repository {
        Repository {
            owner: model
                .owner
                .map(|author| author.login)
                .unwrap_or_else(|| fallback_owner.to_string()),
            name: model.name,
            html_url: model.html_url.map(|url| url.to_string()),
        }
    }
}

#[async_trait]
impl Platform for GitHub {
    async fn organization(&self, name: &str) -> PlatformResult<Owner> {
        debug!(org = name, "fetching organization");
        let org = self.client.orgs(name).get().await?;
        Ok(Owner::organization(org.login))
    }

    async fn authenticated_user(&self) -> PlatformResult<Owner> {
        debug!("fetching authenticated user");
        let user = self.client.current().user().await?;
        Ok(Owner::user(user.login))
    }

    async fn repository(&self, owner: &Owner, name: &str) -> PlatformResult<Option<Repository>> {
        debug!(owner = %owner.login, repo = name, "fetching repository");
        match self.client.repos(&owner.login, name).get().await {
            Ok(model) => Ok(Some(Self::to_repository(model, &owner.login))),
            Err(err) => {
                let err = PlatformError::from(err);
                if err.is_not_found() {
                    Ok(None)
                } else {
                    Err(err)
                }
            }
        }
    }

    async fn create_repository(
        &self,
        owner: &Owner,
        repo: &NewRepository,
    ) -> PlatformResult<Repository> {
        let route = match owner.kind {
            OwnerKind::Organization => format!("/orgs/{}/repos", owner.login),
            OwnerKind::User => "/user/repos".to_string(),
        };
        let body = CreateRepositoryBody {
            name: &repo.name,
            private: repo.private,
            auto_init: repo.auto_init,
        };
        debug!(%route, repo = %repo.name, "creating repository");
        let created: models::Repository = self.client.post(route, Some(&body)).await?;
        Ok(Self::to_repository(created, &owner.login))
    }

    async fn create_file(&self, repo: &Repository, file: &NewFile) -> PlatformResult<()> {
        debug!(repo = %repo.full_name(), path = %file.path, "creating file");
        self.client
            .repos(&repo.owner, &repo.name)
            .create_file(&file.path, &file.message, &file.content)
            .send()
            .await?;
        Ok(())
    }

    async fn add_collaborator(
        &self,
        repo: &Repository,
        login: &str,
        permission: &str,
    ) -> PlatformResult<()> {
        let route = format!(
            "/repos/{}/{}/collaborators/{}",
            repo.owner, repo.name, login
        );
        debug!(%route, permission, "adding collaborator");
        let response = self
            .client
            ._put(route, Some(&CollaboratorBody { permission }))
            .await?;
        octocrab::map_github_error(response).await?;
        Ok(())
    }
}
