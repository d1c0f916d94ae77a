//! Memoizing decorators for the directory and query ports.

use async_trait::async_trait;
use resolution_cache::{CacheStats, MemoizeConfig, MemoizedCache};
use resolution_core::{AssetQuery, BackendResult, OrganisationDirectory, Provider};
use serde_json::Value;
use tracing::trace;

/// An [`OrganisationDirectory`] whose lookups by id and by name are memoized.
#[derive(Debug)]
pub struct CachedDirectory<D> {
    inner: D,
    by_id: MemoizedCache<String, Provider>,
    by_name: MemoizedCache<String, Provider>,
}

impl<D: OrganisationDirectory> CachedDirectory<D> {
    pub fn new(inner: D, config: &MemoizeConfig) -> Self {
        Self {
            inner,
            by_id: MemoizedCache::new(config),
            by_name: MemoizedCache::new(config),
        }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }

    pub fn by_id_stats(&self) -> CacheStats {
        self.by_id.stats()
    }

    pub fn by_name_stats(&self) -> CacheStats {
        self.by_name.stats()
    }
}

#[async_trait]
impl<D: OrganisationDirectory> OrganisationDirectory for CachedDirectory<D> {
    async fn organisation_by_id(&self, id: &str) -> BackendResult<Provider> {
        self.by_id
            .call_async(id.to_owned(), |id| async move {
                trace!(organisation_id = %id, "directory lookup by id");
                self.inner.organisation_by_id(&id).await
            })
            .await
    }

    async fn organisation_by_name(&self, name: &str) -> BackendResult<Provider> {
        self.by_name
            .call_async(name.to_owned(), |name| async move {
                trace!(name = %name, "directory lookup by name");
                self.inner.organisation_by_name(&name).await
            })
            .await
    }
}

/// An [`AssetQuery`] whose licensor lookups are memoized; asset details and
/// offers pass through.
#[derive(Debug)]
pub struct CachedQuery<Q> {
    inner: Q,
    providers: MemoizedCache<(String, String), Vec<Provider>>,
}

impl<Q: AssetQuery> CachedQuery<Q> {
    pub fn new(inner: Q, config: &MemoizeConfig) -> Self {
        Self {
            inner,
            providers: MemoizedCache::new(config),
        }
    }

    pub fn inner(&self) -> &Q {
        &self.inner
    }

    pub fn providers_stats(&self) -> CacheStats {
        self.providers.stats()
    }
}

#[async_trait]
impl<Q: AssetQuery> AssetQuery for CachedQuery<Q> {
    async fn asset_details(&self, hub_key: &str) -> BackendResult<Value> {
        self.inner.asset_details(hub_key).await
    }

    async fn search_offers(&self, id_type: &str, source_id: &str) -> BackendResult<Vec<Value>> {
        self.inner.search_offers(id_type, source_id).await
    }

    async fn providers_for_source_id(
        &self,
        id_type: &str,
        source_id: &str,
    ) -> BackendResult<Vec<Provider>> {
        let key = (id_type.to_owned(), source_id.to_owned());
        self.providers
            .call_async(key, |(id_type, source_id)| async move {
                trace!(id_type = %id_type, source_id = %source_id, "licensor lookup");
                self.inner.providers_for_source_id(&id_type, &source_id).await
            })
            .await
    }
}
