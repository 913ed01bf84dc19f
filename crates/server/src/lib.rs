//! # civdoc-server
//!
//! HTTP front end for the `civdoc` document components. Routes live in
//! [`router`], request handling in [`handlers`], and startup configuration in
//! [`config`].

pub mod config;
pub mod errors;
pub mod handlers;
pub mod router;
pub mod state;
pub mod types;

use crate::{
    config::{get_config, AppConfig},
    router::create_router,
    state::build_app_state,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Builds the application from `config` and serves it on `listener` until
/// the process receives Ctrl-C.
pub async fn run(listener: TcpListener, config: AppConfig) -> anyhow::Result<()> {
    debug!(?config, "Server configuration loaded");

    let app = create_router(build_app_state(config)?);
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining in-flight requests.");
}

/// Process entry point: logging, `.env`, configuration, then [`run`] on
/// `0.0.0.0:{port}`.
pub async fn start() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = get_config(None)?;
    let listener = TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], config.port))).await?;
    info!(
        model = %config.ai.model_name,
        strict_status_codes = config.strict_status_codes,
        "Starting civdoc server on port {}",
        config.port
    );

    run(listener, config).await
}
