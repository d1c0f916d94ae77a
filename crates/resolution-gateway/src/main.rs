mod cli;

use crate::cli::CLI;
use clap::Parser;
use resolution_cache::MemoizeConfig;
use resolution_clients::BackendConfig;
use resolution_gateway::logging::init_tracing;
use resolution_gateway::state::http_backends;
use resolution_gateway::{App, AppState};
use resolution_service::{RouterConfig, ServiceConfig};
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::try_parse()?;
    init_tracing(config.log_format.into())?;

    let backend_config = BackendConfig::builder()
        .accounts_url(config.accounts_url)
        .repository_url(config.repository_url)
        .index_url(config.index_url)
        .query_url(config.query_url)
        .timeout(Duration::from_secs(config.backend_timeout_secs))
        .build();
    let memoize = MemoizeConfig::builder()
        .max_items(config.memoize_max_items)
        .ttl(Duration::from_secs(config.memoize_ttl_secs))
        .build();
    let service = ServiceConfig::builder()
        .resolver_id(config.resolver_id)
        .hub_id(config.hub_id)
        .build();
    let router = RouterConfig::builder()
        .host_domain(config.host_domain)
        .ignored_subdomains(config.ignored_subdomains)
        .default_redirect_website(config.default_redirect_website)
        .build();

    let backends = http_backends(&backend_config, &memoize)?;
    let state = AppState::new(&backends, service, router, config.public_scheme)?;

    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    info!(
        listen_addr = %listener.local_addr()?,
        accounts_url = %backend_config.accounts_url,
        log_format = %config.log_format,
        "starting resolution gateway"
    );

    axum::serve(listener, App::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("resolution gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
