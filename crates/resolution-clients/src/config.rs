use std::time::Duration;
use typed_builder::TypedBuilder;
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Locations of the backend services.
#[derive(Debug, Clone, TypedBuilder)]
pub struct BackendConfig {
    /// Organisation directory and repository registrations.
    pub accounts_url: Url,
    /// Per-repository asset identifiers.
    pub repository_url: Url,
    /// Global identifier index.
    pub index_url: Url,
    /// Asset details, offers and licensors.
    pub query_url: Url,
    /// Per-request timeout of the HTTP transport.
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,
}
