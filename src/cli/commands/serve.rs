//! Serve command handler

use anyhow::Context;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

use crate::api;
use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_serve(config: Config) -> anyhow::Result<()> {
    info!("Tessera v{} starting...", env!("CARGO_PKG_VERSION"));

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        info!("Prometheus metrics recorder initialized");
        Some(handle)
    } else {
        None
    };

    let addr = format!("{}:{}", config.server.bind_address, config.server.port);

    let shared = Arc::new(SharedState::new(config).await?);
    let state = api::create_app_state(shared, prometheus_handle);
    let app = api::router(state).await;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Web Server running at http://{}", addr);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Web server error: {}", e);
        return Err(e.into());
    }

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
