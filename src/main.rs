use anyhow::Result;
use axum::Router;
use std::{io::ErrorKind, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod config;
mod errors;
mod handlers;
mod models;
mod routes;
mod services;

use services::{
    content_store::HttpContentStore, controller::ContentStoreController,
    url_arbiter::HttpUrlArbiter,
};

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // --- Parse config ---
    let cfg = config::AppConfig::from_env_and_args()?;

    tracing::info!("Starting publishing-gateway with config: {:?}", cfg);

    // --- Initialize downstream clients ---
    let arbiter = HttpUrlArbiter::new(&cfg.url_arbiter_url, cfg.downstream_timeout)?;
    let content_store = HttpContentStore::new(&cfg.content_store_url, cfg.downstream_timeout)?;
    let controller = ContentStoreController::new(Arc::new(arbiter), Arc::new(content_store));

    // --- Build router ---
    let app: Router = routes::routes::routes().with_state(controller);

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
