//! Ports to the backend services the resolver composes.
//!
//! Implementations report failures as [`BackendError`][crate::BackendError],
//! tagged with the [`Service`][crate::Service] they talk to. A missing
//! resource is `NotFound`; everything else is `Unexpected`.

use crate::error::BackendResult;
use crate::identifier::{RepositoryEntity, RepositoryInfo, SourceIdentifier};
use crate::provider::Provider;
use async_trait::async_trait;
use serde_json::Value;

/// The organisation directory.
#[async_trait]
pub trait OrganisationDirectory: Send + Sync + 'static {
    /// Looks up an organisation by its id.
    async fn organisation_by_id(&self, id: &str) -> BackendResult<Provider>;

    /// Looks up an organisation by its name.
    async fn organisation_by_name(&self, name: &str) -> BackendResult<Provider>;
}

/// Repository registrations and the per-repository asset identifier service.
#[async_trait]
pub trait RepositoryService: Send + Sync + 'static {
    /// Looks up a repository registration.
    async fn repository(&self, repository_id: &str) -> BackendResult<RepositoryInfo>;

    /// Lists the external identifiers a repository holds for one of its entities.
    async fn ids_for_asset(
        &self,
        repository_id: &str,
        entity_id: &str,
    ) -> BackendResult<Vec<SourceIdentifier>>;
}

/// The global identifier index.
#[async_trait]
pub trait IdentifierIndex: Send + Sync + 'static {
    /// Lists the repositories holding an entity with the given external id,
    /// in the order the index returns them.
    async fn repositories_for_source_id(
        &self,
        id_type: &str,
        source_id: &str,
    ) -> BackendResult<Vec<RepositoryEntity>>;
}

/// The asset and offer query service.
#[async_trait]
pub trait AssetQuery: Send + Sync + 'static {
    /// Fetches the statement graph describing the entity a hub key names.
    async fn asset_details(&self, hub_key: &str) -> BackendResult<Value>;

    /// Fetches the offer graphs attached to an asset.
    async fn search_offers(&self, id_type: &str, source_id: &str) -> BackendResult<Vec<Value>>;

    /// Lists the organisations licensing an asset with the given external id.
    async fn providers_for_source_id(
        &self,
        id_type: &str,
        source_id: &str,
    ) -> BackendResult<Vec<Provider>>;
}
