use crate::error::ClientError;
use crate::http::JsonApi;
use async_trait::async_trait;
use resolution_core::{BackendResult, IdentifierIndex, RepositoryEntity, Service};
use url::Url;

/// Client of the global identifier index.
#[derive(Debug, Clone)]
pub struct IndexClient {
    api: JsonApi,
}

impl IndexClient {
    pub fn new(client: reqwest::Client, index_url: Url) -> Result<Self, ClientError> {
        Ok(Self {
            api: JsonApi::new(client, index_url, Service::Index)?,
        })
    }
}

#[async_trait]
impl IdentifierIndex for IndexClient {
    async fn repositories_for_source_id(
        &self,
        id_type: &str,
        source_id: &str,
    ) -> BackendResult<Vec<RepositoryEntity>> {
        let url = self.api.endpoint(&[
            "v1",
            "index",
            "entity-types",
            "asset",
            "id-types",
            id_type,
            "ids",
            source_id,
            "repositories",
        ]);
        self.api.get(url).await
    }
}
