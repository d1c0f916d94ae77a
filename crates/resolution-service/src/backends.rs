use resolution_core::{AssetQuery, IdentifierIndex, OrganisationDirectory, RepositoryService};
use std::sync::Arc;

/// The four backend ports, shared by every component of the service.
#[derive(Clone)]
pub struct Backends {
    pub directory: Arc<dyn OrganisationDirectory>,
    pub repositories: Arc<dyn RepositoryService>,
    pub index: Arc<dyn IdentifierIndex>,
    pub query: Arc<dyn AssetQuery>,
}

impl Backends {
    pub fn new(
        directory: Arc<dyn OrganisationDirectory>,
        repositories: Arc<dyn RepositoryService>,
        index: Arc<dyn IdentifierIndex>,
        query: Arc<dyn AssetQuery>,
    ) -> Self {
        Self {
            directory,
            repositories,
            index,
            query,
        }
    }

    /// Uses one value for all four ports.
    pub fn shared<B>(backend: Arc<B>) -> Self
    where
        B: OrganisationDirectory + RepositoryService + IdentifierIndex + AssetQuery,
    {
        Self {
            directory: backend.clone(),
            repositories: backend.clone(),
            index: backend.clone(),
            query: backend,
        }
    }
}
