use anyhow::Context;

use carhub_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    carhub_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let services = carhub_api::app::services::build_services(&config.storage)
        .await
        .context("failed to initialize car repository")?;

    let app = carhub_api::app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
}
