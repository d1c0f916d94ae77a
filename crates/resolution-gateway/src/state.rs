use crate::error::GatewayError;
use resolution_cache::MemoizeConfig;
use resolution_clients::{BackendConfig, HttpBackends};
use resolution_service::{
    Backends, CachedDirectory, CachedQuery, HubKeyHandler, QueryRouter, RouterConfig,
    ServiceConfig,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub(crate) hub_keys: HubKeyHandler,
    pub(crate) router: QueryRouter,
    pub(crate) public_scheme: String,
}

impl AppState {
    /// `public_scheme` is the scheme clients reach the gateway on; it becomes
    /// part of the hub keys read from request URLs.
    pub fn new(
        backends: &Backends,
        service: ServiceConfig,
        router: RouterConfig,
        public_scheme: impl Into<String>,
    ) -> Result<Self, GatewayError> {
        let public_scheme = public_scheme.into();
        if !matches!(public_scheme.as_str(), "http" | "https") {
            return Err(GatewayError::InvalidScheme(public_scheme));
        }

        Ok(Self {
            hub_keys: HubKeyHandler::new(backends),
            router: QueryRouter::new(backends, service, router),
            public_scheme,
        })
    }
}

/// The HTTP backends, with directory and licensor lookups memoized.
pub fn http_backends(
    config: &BackendConfig,
    memoize: &MemoizeConfig,
) -> Result<Backends, GatewayError> {
    let http = HttpBackends::connect(config)?;
    Ok(Backends::new(
        Arc::new(CachedDirectory::new(http.directory, memoize)),
        Arc::new(http.repositories),
        Arc::new(http.index),
        Arc::new(CachedQuery::new(http.query, memoize)),
    ))
}
