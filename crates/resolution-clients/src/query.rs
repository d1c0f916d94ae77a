use crate::error::ClientError;
use crate::http::JsonApi;
use async_trait::async_trait;
use resolution_core::{AssetQuery, BackendResult, Provider, Service};
use serde_json::Value;
use url::Url;

/// Client of the query service.
#[derive(Debug, Clone)]
pub struct QueryClient {
    api: JsonApi,
}

impl QueryClient {
    pub fn new(client: reqwest::Client, query_url: Url) -> Result<Self, ClientError> {
        Ok(Self {
            api: JsonApi::new(client, query_url, Service::Query)?,
        })
    }

    fn by_source_id(&self, leaf: &[&str], id_type: &str, source_id: &str) -> Url {
        let mut segments = vec!["v1", "query"];
        segments.extend_from_slice(leaf);
        self.api.endpoint_with_query(
            &segments,
            &[("source_id_type", id_type), ("source_id", source_id)],
        )
    }
}

#[async_trait]
impl AssetQuery for QueryClient {
    async fn asset_details(&self, hub_key: &str) -> BackendResult<Value> {
        let url = self
            .api
            .endpoint_with_query(&["v1", "query", "entities"], &[("hub_key", hub_key)]);
        self.api.get(url).await
    }

    async fn search_offers(&self, id_type: &str, source_id: &str) -> BackendResult<Vec<Value>> {
        let url = self.by_source_id(&["search", "offers"], id_type, source_id);
        self.api.get(url).await
    }

    async fn providers_for_source_id(
        &self,
        id_type: &str,
        source_id: &str,
    ) -> BackendResult<Vec<Provider>> {
        let url = self.by_source_id(&["licensors"], id_type, source_id);
        self.api.get(url).await
    }
}
