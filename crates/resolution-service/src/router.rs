use crate::backends::Backends;
use crate::config::{RouterConfig, ServiceConfig};
use crate::orchestrator::AssetRedirectOrchestrator;
use crate::view::{Disambiguation, RedirectDecision, View};
use resolution_core::{AssetQuery, OrganisationDirectory, Provider, ResolveError, Result};
use std::sync::Arc;
use tracing::{debug, warn};

/// A request to the query parameter entry point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryRequest {
    /// `hubpid`, the provider's name.
    pub provider_id: Option<String>,
    /// `hubidt`
    pub id_type: Option<String>,
    /// `hubaid`
    pub asset_id: Option<String>,
    /// `hubjson`
    pub json: bool,
    /// The `Host` the request was sent to.
    pub host: Option<String>,
    /// Every query parameter of the request, in order.
    pub forwarded: Vec<(String, String)>,
}

impl QueryRequest {
    /// Reads the routing parameters out of a request's query pairs. The first
    /// occurrence of a parameter counts and empty values count as absent.
    pub fn from_pairs(pairs: Vec<(String, String)>, host: Option<String>) -> Self {
        let first = |name: &str| {
            pairs
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.clone())
                .filter(|value| !value.is_empty())
        };

        Self {
            provider_id: first("hubpid"),
            id_type: first("hubidt"),
            asset_id: first("hubaid"),
            json: first("hubjson").is_some(),
            host,
            forwarded: pairs,
        }
    }
}

/// Entry point for requests that name an asset by query parameters.
#[derive(Clone)]
pub struct QueryRouter {
    directory: Arc<dyn OrganisationDirectory>,
    query: Arc<dyn AssetQuery>,
    orchestrator: AssetRedirectOrchestrator,
    config: RouterConfig,
}

impl QueryRouter {
    pub fn new(backends: &Backends, service: ServiceConfig, config: RouterConfig) -> Self {
        Self {
            directory: Arc::clone(&backends.directory),
            query: Arc::clone(&backends.query),
            orchestrator: AssetRedirectOrchestrator::new(backends, service),
            config,
        }
    }

    pub async fn route(&self, request: QueryRequest) -> RedirectDecision {
        match self.try_route(request).await {
            Ok(decision) => decision,
            Err(e) => {
                warn!(status = e.status(), error = %e, "query not resolved");
                RedirectDecision::Error(e)
            }
        }
    }

    async fn try_route(&self, request: QueryRequest) -> Result<RedirectDecision> {
        let QueryRequest {
            provider_id,
            id_type,
            asset_id,
            json,
            host,
            forwarded,
        } = request;

        let host_provider = host.as_deref().and_then(|host| self.host_provider(host));
        let provider_id = match (provider_id, host_provider) {
            (Some(param), Some(host)) if !param.eq_ignore_ascii_case(&host) => {
                return Err(ResolveError::ConflictingProvider { host, param });
            }
            (param, host) => param.or(host),
        };

        match (provider_id, id_type, asset_id) {
            (None, None, None) => {
                debug!("no parameters, redirecting to default website");
                Ok(RedirectDecision::Redirect(
                    self.config.default_redirect_website.clone(),
                ))
            }
            (None, Some(id_type), Some(asset_id)) => {
                let mut providers = self
                    .query
                    .providers_for_source_id(&id_type, &asset_id)
                    .await
                    .map_err(|e| ResolveError::upstream(e, "No matching providers found"))?;
                debug!(id_type, asset_id, providers = providers.len(), "looked up licensors");

                match providers.len() {
                    1 => {
                        let provider = providers.remove(0);
                        Ok(self
                            .orchestrator
                            .resolve_and_redirect(provider, &id_type, &asset_id, json, &forwarded)
                            .await)
                    }
                    _ => Ok(RedirectDecision::Disambiguate(Disambiguation {
                        providers: providers.into_iter().map(Provider::normalized).collect(),
                        id_type,
                        asset_id,
                    })),
                }
            }
            (Some(name), None, None) => {
                let provider = self.provider_by_name(&name).await?;
                Ok(RedirectDecision::render(View::Provider(provider), json))
            }
            (Some(name), Some(id_type), Some(asset_id)) => {
                let provider = self.provider_by_name(&name).await?;
                Ok(self
                    .orchestrator
                    .resolve_and_redirect(provider, &id_type, &asset_id, json, &forwarded)
                    .await)
            }
            _ => Err(ResolveError::IncompleteQuery),
        }
    }

    async fn provider_by_name(&self, name: &str) -> Result<Provider> {
        self.directory
            .organisation_by_name(name)
            .await
            .map(Provider::normalized)
            .map_err(|e| ResolveError::upstream(e, "Unknown provider"))
    }

    /// The provider named by a `{provider}.{host_domain}` host, if any.
    fn host_provider(&self, host: &str) -> Option<String> {
        let host = strip_port(host).to_ascii_lowercase();
        let domain = self.config.host_domain.to_ascii_lowercase();
        let subdomain = host.strip_suffix(domain.as_str())?.strip_suffix('.')?;

        let is_single_label = !subdomain.is_empty() && !subdomain.contains('.');
        let ignored = self
            .config
            .ignored_subdomains
            .iter()
            .any(|ignored| ignored.eq_ignore_ascii_case(subdomain));
        (is_single_label && !ignored).then(|| subdomain.to_owned())
    }
}

fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        return host;
    }
    host.rsplit_once(':').map_or(host, |(name, _)| name)
}
