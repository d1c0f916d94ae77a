use typed_builder::TypedBuilder;

pub const DEFAULT_RESOLVER_ID: &str = "https://openpermissions.org";
pub const DEFAULT_HUB_ID: &str = "hub1";
pub const DEFAULT_HOST_DOMAIN: &str = "copyrighthub.org";
pub const DEFAULT_IGNORED_SUBDOMAIN: &str = "www";
pub const DEFAULT_REDIRECT_WEBSITE: &str = "http://openpermissions.org/";

/// Identity of this resolver, used for the hub keys it builds itself.
#[derive(Debug, Clone, TypedBuilder)]
pub struct ServiceConfig {
    #[builder(default = DEFAULT_RESOLVER_ID.to_string(), setter(into))]
    pub resolver_id: String,
    #[builder(default = DEFAULT_HUB_ID.to_string(), setter(into))]
    pub hub_id: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Settings of the query parameter entry point.
#[derive(Debug, Clone, TypedBuilder)]
pub struct RouterConfig {
    /// Domain whose subdomains name a provider, e.g. `maryevans.copyrighthub.org`.
    #[builder(default = DEFAULT_HOST_DOMAIN.to_string(), setter(into))]
    pub host_domain: String,
    /// Subdomains of `host_domain` that do not name a provider.
    #[builder(default = vec![DEFAULT_IGNORED_SUBDOMAIN.to_string()])]
    pub ignored_subdomains: Vec<String>,
    /// Where requests without any parameter are sent.
    #[builder(default = DEFAULT_REDIRECT_WEBSITE.to_string(), setter(into))]
    pub default_redirect_website: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
