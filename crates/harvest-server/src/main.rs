use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use harvest_db::{Database, DatabaseConfig};
use harvest_server::settings::{LogFormat, ServerConfig};
use harvest_server::state::AppState;

const DEFAULT_LOG_FILTER: &str = "harvest_server=info,harvest_db=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let settings = ServerConfig::from_env()?;
    init_tracing(settings.log_format);

    let db = Database::connect(&DatabaseConfig::from_env()?).await?;
    db.migrate().await?;

    let addr = settings.addr();
    tracing::info!(
        project = %settings.project_name,
        prefix = %settings.api_prefix,
        "Starting server on {addr}"
    );

    let state = Arc::new(AppState { db, settings });
    let app = harvest_server::app(state);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install CTRL+C handler");
        return;
    }
    tracing::info!("Shutdown signal received");
}
