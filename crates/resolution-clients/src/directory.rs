use crate::error::ClientError;
use crate::http::JsonApi;
use async_trait::async_trait;
use resolution_core::{BackendError, BackendResult, OrganisationDirectory, Provider, Service};
use url::Url;

/// Organisation lookups against the accounts service.
#[derive(Debug, Clone)]
pub struct OrganisationDirectoryClient {
    api: JsonApi,
}

impl OrganisationDirectoryClient {
    pub fn new(client: reqwest::Client, accounts_url: Url) -> Result<Self, ClientError> {
        Ok(Self {
            api: JsonApi::new(client, accounts_url, Service::Directory)?,
        })
    }
}

#[async_trait]
impl OrganisationDirectory for OrganisationDirectoryClient {
    async fn organisation_by_id(&self, id: &str) -> BackendResult<Provider> {
        let url = self.api.endpoint(&["v1", "accounts", "organisations", id]);
        self.api.get(url).await
    }

    async fn organisation_by_name(&self, name: &str) -> BackendResult<Provider> {
        let url = self
            .api
            .endpoint_with_query(&["v1", "accounts", "organisations"], &[("name", name)]);
        let organisations: Vec<Provider> = self.api.get(url).await?;
        organisations
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::not_found(Service::Directory, "Unknown provider"))
    }
}
