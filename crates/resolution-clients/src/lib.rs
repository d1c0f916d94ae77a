//! Backend clients for the hub key resolver.
//!
//! The HTTP clients in this crate implement the port traits of
//! `resolution_core::backend` against the accounts, repository, index and
//! query services. [`InMemoryBackend`] implements all four ports in memory
//! for tests and local runs.

pub mod config;
pub mod directory;
pub mod error;
mod http;
pub mod index;
pub mod memory;
pub mod query;
pub mod repository;

pub use config::BackendConfig;
pub use directory::OrganisationDirectoryClient;
pub use error::ClientError;
pub use index::IndexClient;
pub use memory::{Call, InMemoryBackend};
pub use query::QueryClient;
pub use repository::RepositoryClient;

/// The four HTTP clients, sharing one connection pool.
#[derive(Debug, Clone)]
pub struct HttpBackends {
    pub directory: OrganisationDirectoryClient,
    pub repositories: RepositoryClient,
    pub index: IndexClient,
    pub query: QueryClient,
}

impl HttpBackends {
    pub fn connect(config: &BackendConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("resolution/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            directory: OrganisationDirectoryClient::new(
                client.clone(),
                config.accounts_url.clone(),
            )?,
            repositories: RepositoryClient::new(
                client.clone(),
                config.accounts_url.clone(),
                config.repository_url.clone(),
            )?,
            index: IndexClient::new(client.clone(), config.index_url.clone())?,
            query: QueryClient::new(client, config.query_url.clone())?,
        })
    }
}
