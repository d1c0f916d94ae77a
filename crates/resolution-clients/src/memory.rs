use async_trait::async_trait;
use dashmap::DashMap;
use resolution_core::{
    AssetQuery, BackendError, BackendResult, IdentifierIndex, OrganisationDirectory, Provider,
    RepositoryEntity, RepositoryInfo, RepositoryService, Service, SourceIdentifier,
};
use serde_json::Value;

/// A backend operation, as counted by [`InMemoryBackend`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    OrganisationById,
    OrganisationByName,
    Repository,
    IdsForAsset,
    RepositoriesForSourceId,
    AssetDetails,
    SearchOffers,
    ProvidersForSourceId,
}

impl Call {
    pub fn service(self) -> Service {
        match self {
            Call::OrganisationById | Call::OrganisationByName => Service::Directory,
            Call::Repository | Call::IdsForAsset => Service::Repository,
            Call::RepositoriesForSourceId => Service::Index,
            Call::AssetDetails | Call::SearchOffers | Call::ProvidersForSourceId => Service::Query,
        }
    }
}

type PairKey = (String, String);

fn pair(a: &str, b: &str) -> PairKey {
    (a.to_owned(), b.to_owned())
}

/// All four backend ports held in memory.
///
/// Singular resources (organisations, repositories, asset details) that are
/// absent answer `NotFound`, like the HTTP services do. Absent lists answer
/// empty. Every call is counted per [`Call`], and a [`Service`] can be made to
/// fail with [`fail`](Self::fail).
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    organisations: DashMap<String, Provider>,
    repositories: DashMap<String, RepositoryInfo>,
    asset_ids: DashMap<PairKey, Vec<SourceIdentifier>>,
    index: DashMap<PairKey, Vec<RepositoryEntity>>,
    details: DashMap<String, Value>,
    offers: DashMap<PairKey, Vec<Value>>,
    licensors: DashMap<PairKey, Vec<Provider>>,
    failures: DashMap<Service, BackendError>,
    calls: DashMap<Call, usize>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_organisation(&self, provider: Provider) {
        self.organisations.insert(provider.id.clone(), provider);
    }

    pub fn insert_repository(&self, repository_id: &str, info: RepositoryInfo) {
        self.repositories.insert(repository_id.to_owned(), info);
    }

    pub fn insert_asset_ids(
        &self,
        repository_id: &str,
        entity_id: &str,
        ids: Vec<SourceIdentifier>,
    ) {
        self.asset_ids.insert(pair(repository_id, entity_id), ids);
    }

    pub fn insert_index_entry(
        &self,
        id_type: &str,
        source_id: &str,
        entries: Vec<RepositoryEntity>,
    ) {
        self.index.insert(pair(id_type, source_id), entries);
    }

    pub fn insert_asset_details(&self, hub_key: &str, graph: Value) {
        self.details.insert(hub_key.to_owned(), graph);
    }

    pub fn insert_offers(&self, id_type: &str, source_id: &str, offers: Vec<Value>) {
        self.offers.insert(pair(id_type, source_id), offers);
    }

    pub fn insert_licensors(&self, id_type: &str, source_id: &str, providers: Vec<Provider>) {
        self.licensors.insert(pair(id_type, source_id), providers);
    }

    /// Makes every following call to `service` fail with `error`.
    pub fn fail(&self, service: Service, error: BackendError) {
        self.failures.insert(service, error);
    }

    pub fn recover(&self, service: Service) {
        self.failures.remove(&service);
    }

    /// Number of calls made to one operation.
    pub fn calls(&self, call: Call) -> usize {
        self.calls.get(&call).map(|count| *count).unwrap_or(0)
    }

    /// Number of calls made to any operation of `service`.
    pub fn calls_to(&self, service: Service) -> usize {
        self.calls
            .iter()
            .filter(|entry| entry.key().service() == service)
            .map(|entry| *entry.value())
            .sum()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.iter().map(|entry| *entry.value()).sum()
    }

    fn record(&self, call: Call) -> BackendResult<()> {
        *self.calls.entry(call).or_insert(0) += 1;
        match self.failures.get(&call.service()) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl OrganisationDirectory for InMemoryBackend {
    async fn organisation_by_id(&self, id: &str) -> BackendResult<Provider> {
        self.record(Call::OrganisationById)?;
        self.organisations
            .get(id)
            .map(|entry| entry.clone())
            .ok_or_else(|| {
                BackendError::not_found(Service::Directory, format!("organisation {id} not found"))
            })
    }

    async fn organisation_by_name(&self, name: &str) -> BackendResult<Provider> {
        self.record(Call::OrganisationByName)?;
        self.organisations
            .iter()
            .find(|entry| entry.value().name == name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| BackendError::not_found(Service::Directory, "Unknown provider"))
    }
}

#[async_trait]
impl RepositoryService for InMemoryBackend {
    async fn repository(&self, repository_id: &str) -> BackendResult<RepositoryInfo> {
        self.record(Call::Repository)?;
        self.repositories
            .get(repository_id)
            .map(|entry| entry.clone())
            .ok_or_else(|| {
                BackendError::not_found(
                    Service::Repository,
                    format!("repository {repository_id} not found"),
                )
            })
    }

    async fn ids_for_asset(
        &self,
        repository_id: &str,
        entity_id: &str,
    ) -> BackendResult<Vec<SourceIdentifier>> {
        self.record(Call::IdsForAsset)?;
        Ok(self
            .asset_ids
            .get(&pair(repository_id, entity_id))
            .map(|entry| entry.clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl IdentifierIndex for InMemoryBackend {
    async fn repositories_for_source_id(
        &self,
        id_type: &str,
        source_id: &str,
    ) -> BackendResult<Vec<RepositoryEntity>> {
        self.record(Call::RepositoriesForSourceId)?;
        Ok(self
            .index
            .get(&pair(id_type, source_id))
            .map(|entry| entry.clone())
            .unwrap_or_default())
    }
}

#[async_trait]
impl AssetQuery for InMemoryBackend {
    async fn asset_details(&self, hub_key: &str) -> BackendResult<Value> {
        self.record(Call::AssetDetails)?;
        self.details
            .get(hub_key)
            .map(|entry| entry.clone())
            .ok_or_else(|| {
                BackendError::not_found(Service::Query, format!("no details for {hub_key}"))
            })
    }

    async fn search_offers(&self, id_type: &str, source_id: &str) -> BackendResult<Vec<Value>> {
        self.record(Call::SearchOffers)?;
        Ok(self
            .offers
            .get(&pair(id_type, source_id))
            .map(|entry| entry.clone())
            .unwrap_or_default())
    }

    async fn providers_for_source_id(
        &self,
        id_type: &str,
        source_id: &str,
    ) -> BackendResult<Vec<Provider>> {
        self.record(Call::ProvidersForSourceId)?;
        Ok(self
            .licensors
            .get(&pair(id_type, source_id))
            .map(|entry| entry.clone())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    fn provider(id: &str, name: &str) -> Provider {
        Provider {
            id: id.to_owned(),
            name: name.to_owned(),
            ..Provider::default()
        }
    }

    #[tokio::test]
    async fn organisation_lookups() {
        let backend = InMemoryBackend::new();
        backend.insert_organisation(provider("orgA", "Org A"));

        assert_eq!(backend.organisation_by_id("orgA").await.unwrap().name, "Org A");
        assert_eq!(backend.organisation_by_name("Org A").await.unwrap().id, "orgA");
        assert!(backend
            .organisation_by_id("orgB")
            .await
            .unwrap_err()
            .is_not_found());
        assert_eq!(
            backend.organisation_by_name("Org B").await.unwrap_err(),
            BackendError::not_found(Service::Directory, "Unknown provider")
        );
    }

    #[tokio::test]
    async fn missing_lists_are_empty() {
        let backend = InMemoryBackend::new();

        assert!(backend.ids_for_asset("r", "e").await.unwrap().is_empty());
        assert!(backend
            .repositories_for_source_id("isbn", "1")
            .await
            .unwrap()
            .is_empty());
        assert!(backend.search_offers("isbn", "1").await.unwrap().is_empty());
        assert!(backend
            .providers_for_source_id("isbn", "1")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn missing_details_are_not_found() {
        let backend = InMemoryBackend::new();
        backend.insert_asset_details("k1", json!([]));

        assert_eq!(backend.asset_details("k1").await.unwrap(), json!([]));
        let err = backend.asset_details("k2").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.service(), Service::Query);
    }

    #[tokio::test]
    async fn counts_calls_per_operation_and_service() {
        let backend = InMemoryBackend::new();
        backend.insert_repository(
            "repo1",
            RepositoryInfo {
                organisation_id: "orgA".to_owned(),
                service_location: None,
            },
        );

        backend.repository("repo1").await.unwrap();
        backend.ids_for_asset("repo1", "e1").await.unwrap();
        backend.ids_for_asset("repo1", "e2").await.unwrap();
        let _ = backend.organisation_by_id("orgA").await;

        assert_eq!(backend.calls(Call::Repository), 1);
        assert_eq!(backend.calls(Call::IdsForAsset), 2);
        assert_eq!(backend.calls(Call::AssetDetails), 0);
        assert_eq!(backend.calls_to(Service::Repository), 3);
        assert_eq!(backend.total_calls(), 4);
    }

    #[tokio::test]
    async fn injected_failure_applies_to_the_whole_service() {
        let backend = InMemoryBackend::new();
        let error = BackendError::unexpected(Service::Index, Some(503), "unavailable");
        backend.fail(Service::Index, error.clone());

        assert_eq!(
            backend
                .repositories_for_source_id("isbn", "1")
                .await
                .unwrap_err(),
            error
        );
        assert!(backend.search_offers("isbn", "1").await.is_ok());

        backend.recover(Service::Index);
        assert!(backend.repositories_for_source_id("isbn", "1").await.is_ok());
        assert_eq!(backend.calls(Call::RepositoriesForSourceId), 2);
    }

    #[tokio::test]
    async fn concurrent_lookups() {
        let backend = Arc::new(InMemoryBackend::new());
        for i in 0..10 {
            backend.insert_organisation(provider(&format!("org-{i}"), &format!("Org {i}")));
        }

        let mut handles = vec![];
        for i in 0..10 {
            let backend = Arc::clone(&backend);
            handles.push(tokio::spawn(async move {
                backend
                    .organisation_by_id(&format!("org-{i}"))
                    .await
                    .unwrap()
            }));
        }

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.await.unwrap().name, format!("Org {i}"));
        }
        assert_eq!(backend.calls(Call::OrganisationById), 10);
    }
}
