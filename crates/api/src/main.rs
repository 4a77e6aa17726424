use anyhow::Context;

use keygate_api::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    keygate_observability::init();

    let config = ServerConfig::from_env().context("invalid configuration")?;
    tracing::info!(?config, "configuration loaded");

    let app = keygate_api::app::build_app(&config).context("invalid token settings")?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
