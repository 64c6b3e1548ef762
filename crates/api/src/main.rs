use anyhow::Context;

use erpbench_api::app::{build_app, services::build_services};
use erpbench_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    erpbench_observability::init();

    let config = ApiConfig::from_env();
    let services = build_services();
    let app = build_app(services.clone(), &config);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        request_id_header = %config.request_id_header,
        "listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    services.close();
    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
