use clap::{Parser, ValueEnum};
use resolution_gateway::logging::LogFormat;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;
use url::Url;

pub const LISTEN_ADDR_ENV: &str = "RESOLUTION_LISTEN_ADDR";
pub const PUBLIC_SCHEME_ENV: &str = "RESOLUTION_PUBLIC_SCHEME";
pub const ACCOUNTS_URL_ENV: &str = "RESOLUTION_ACCOUNTS_URL";
pub const REPOSITORY_URL_ENV: &str = "RESOLUTION_REPOSITORY_URL";
pub const INDEX_URL_ENV: &str = "RESOLUTION_INDEX_URL";
pub const QUERY_URL_ENV: &str = "RESOLUTION_QUERY_URL";
pub const BACKEND_TIMEOUT_ENV: &str = "RESOLUTION_BACKEND_TIMEOUT_SECS";
pub const RESOLVER_ID_ENV: &str = "RESOLUTION_RESOLVER_ID";
pub const HUB_ID_ENV: &str = "RESOLUTION_HUB_ID";
pub const HOST_DOMAIN_ENV: &str = "RESOLUTION_HOST_DOMAIN";
pub const IGNORED_SUBDOMAINS_ENV: &str = "RESOLUTION_IGNORED_SUBDOMAINS";
pub const REDIRECT_WEBSITE_ENV: &str = "RESOLUTION_DEFAULT_REDIRECT_WEBSITE";
pub const MEMOIZE_MAX_ITEMS_ENV: &str = "RESOLUTION_MEMOIZE_MAX_ITEMS";
pub const MEMOIZE_TTL_ENV: &str = "RESOLUTION_MEMOIZE_TTL_SECS";
pub const LOG_FORMAT_ENV: &str = "RESOLUTION_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8009";
pub const DEFAULT_PUBLIC_SCHEME: &str = "https";
pub const DEFAULT_ACCOUNTS_URL: &str = "http://localhost:8006/";
pub const DEFAULT_REPOSITORY_URL: &str = "http://localhost:8004/";
pub const DEFAULT_INDEX_URL: &str = "http://localhost:8011/";
pub const DEFAULT_QUERY_URL: &str = "http://localhost:8008/";
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MEMOIZE_MAX_ITEMS: usize = 1_000;
pub const DEFAULT_MEMOIZE_TTL_SECS: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormatArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormatArg::Text => write!(f, "text"),
            LogFormatArg::Json => write!(f, "json"),
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "resolution-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Scheme clients use to reach this gateway; part of every hub key it reads.
    #[arg(long, env = PUBLIC_SCHEME_ENV, default_value = DEFAULT_PUBLIC_SCHEME)]
    pub public_scheme: String,

    #[arg(long, env = ACCOUNTS_URL_ENV, default_value = DEFAULT_ACCOUNTS_URL)]
    pub accounts_url: Url,

    #[arg(long, env = REPOSITORY_URL_ENV, default_value = DEFAULT_REPOSITORY_URL)]
    pub repository_url: Url,

    #[arg(long, env = INDEX_URL_ENV, default_value = DEFAULT_INDEX_URL)]
    pub index_url: Url,

    #[arg(long, env = QUERY_URL_ENV, default_value = DEFAULT_QUERY_URL)]
    pub query_url: Url,

    #[arg(
        long,
        env = BACKEND_TIMEOUT_ENV,
        default_value_t = DEFAULT_BACKEND_TIMEOUT_SECS,
    )]
    pub backend_timeout_secs: u64,

    #[arg(
        long,
        env = RESOLVER_ID_ENV,
        default_value = resolution_service::config::DEFAULT_RESOLVER_ID,
    )]
    pub resolver_id: String,

    #[arg(long, env = HUB_ID_ENV, default_value = resolution_service::config::DEFAULT_HUB_ID)]
    pub hub_id: String,

    #[arg(
        long,
        env = HOST_DOMAIN_ENV,
        default_value = resolution_service::config::DEFAULT_HOST_DOMAIN,
    )]
    pub host_domain: String,

    #[arg(
        long,
        env = IGNORED_SUBDOMAINS_ENV,
        value_delimiter = ',',
        default_value = resolution_service::config::DEFAULT_IGNORED_SUBDOMAIN,
    )]
    pub ignored_subdomains: Vec<String>,

    #[arg(
        long,
        env = REDIRECT_WEBSITE_ENV,
        default_value = resolution_service::config::DEFAULT_REDIRECT_WEBSITE,
    )]
    pub default_redirect_website: String,

    #[arg(long, env = MEMOIZE_MAX_ITEMS_ENV, default_value_t = DEFAULT_MEMOIZE_MAX_ITEMS)]
    pub memoize_max_items: usize,

    #[arg(long, env = MEMOIZE_TTL_ENV, default_value_t = DEFAULT_MEMOIZE_TTL_SECS)]
    pub memoize_ttl_secs: u64,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Text
    )]
    pub log_format: LogFormatArg,
}
