use crate::backends::Backends;
use resolution_core::{
    HubKey, KeyIds, OrganisationDirectory, Provider, RepositoryService, ResolveError, ResolvedKey,
    Result,
};
use std::sync::Arc;
use tracing::{debug, trace};

/// Attaches the owning provider to a hub key.
#[derive(Clone)]
pub struct ResolutionPipeline {
    directory: Arc<dyn OrganisationDirectory>,
    repositories: Arc<dyn RepositoryService>,
}

impl ResolutionPipeline {
    pub fn new(
        directory: Arc<dyn OrganisationDirectory>,
        repositories: Arc<dyn RepositoryService>,
    ) -> Self {
        Self {
            directory,
            repositories,
        }
    }

    pub fn from_backends(backends: &Backends) -> Self {
        Self::new(
            Arc::clone(&backends.directory),
            Arc::clone(&backends.repositories),
        )
    }

    /// Parses `raw` and looks up its provider.
    ///
    /// s0 keys name the organisation directly; s1 keys name a repository whose
    /// registration names the organisation.
    pub async fn resolve(&self, raw: &str) -> Result<ResolvedKey> {
        let key = HubKey::parse(raw)?;
        trace!(hub_key = %key, schema = %key.schema_version(), "resolving hub key");

        let organisation_id = match &key.ids {
            KeyIds::S0 {
                organisation_id, ..
            } => organisation_id.clone(),
            KeyIds::S1 { repository_id, .. } => {
                let repository = self
                    .repositories
                    .repository(repository_id)
                    .await
                    .map_err(|e| ResolveError::upstream(e, "Unknown repository ID"))?;
                repository.organisation_id
            }
        };

        let provider = self
            .directory
            .organisation_by_id(&organisation_id)
            .await
            .map_err(|e| ResolveError::upstream(e, "Unknown provider ID"))?;

        debug!(hub_key = %key, provider = %provider.id, "resolved provider");
        Ok(Self::attach(key, provider))
    }

    /// Pairs a key with an already known provider.
    pub fn attach(key: HubKey, provider: Provider) -> ResolvedKey {
        ResolvedKey {
            key,
            provider: provider.normalized(),
        }
    }
}
