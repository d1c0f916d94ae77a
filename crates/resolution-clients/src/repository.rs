use crate::error::ClientError;
use crate::http::JsonApi;
use async_trait::async_trait;
use resolution_core::{BackendResult, RepositoryInfo, RepositoryService, Service, SourceIdentifier};
use serde::Deserialize;
use url::Url;

#[derive(Deserialize)]
struct Registration {
    organisation: OrganisationRef,
    #[serde(default)]
    service: Option<ServiceRef>,
}

#[derive(Deserialize)]
struct OrganisationRef {
    id: String,
}

#[derive(Deserialize)]
struct ServiceRef {
    #[serde(default)]
    location: Option<String>,
}

impl From<Registration> for RepositoryInfo {
    fn from(registration: Registration) -> Self {
        Self {
            organisation_id: registration.organisation.id,
            service_location: registration.service.and_then(|s| s.location),
        }
    }
}

/// Repository registrations live in the accounts service; asset identifiers in
/// the repository service.
#[derive(Debug, Clone)]
pub struct RepositoryClient {
    accounts: JsonApi,
    repository: JsonApi,
}

impl RepositoryClient {
    pub fn new(
        client: reqwest::Client,
        accounts_url: Url,
        repository_url: Url,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            accounts: JsonApi::new(client.clone(), accounts_url, Service::Repository)?,
            repository: JsonApi::new(client, repository_url, Service::Repository)?,
        })
    }
}

#[async_trait]
impl RepositoryService for RepositoryClient {
    async fn repository(&self, repository_id: &str) -> BackendResult<RepositoryInfo> {
        let url = self
            .accounts
            .endpoint(&["v1", "accounts", "repositories", repository_id]);
        let registration: Registration = self.accounts.get(url).await?;
        Ok(registration.into())
    }

    async fn ids_for_asset(
        &self,
        repository_id: &str,
        entity_id: &str,
    ) -> BackendResult<Vec<SourceIdentifier>> {
        let url = self.repository.endpoint(&[
            "v1",
            "repository",
            "repositories",
            repository_id,
            "assets",
            entity_id,
            "ids",
        ]);
        self.repository.get(url).await
    }
}
