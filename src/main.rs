use anyhow::Context;
use compound::{AppState, Compound, server, telemetry};
use config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    telemetry::init(&config.logging);

    let compound = Compound::new(&config.database)
        .await
        .context("failed to connect to database")?;
    compound.migrate().await.context("failed to migrate schema")?;

    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    let result = server::serve(listener, AppState::new(&compound), shutdown_signal()).await;

    compound.close().await;
    result.context("server failed")
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(err) => tracing::error!("failed to listen for shutdown signal: {err}"),
    }
}
