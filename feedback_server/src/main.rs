//! Main entry point for the feedback server binary

mod telemetry;

use anyhow::Result;
use feedback_core::{create_app_with_config, run_server, AppConfig, AppState};
use std::net::SocketAddr;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    telemetry::init_tracing(config.logging.format);

    info!("Configuration loaded successfully");
    info!("Server will bind to: {}", config.bind_address());

    let addr: SocketAddr = config.bind_address().parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address: {}", e))?;

    let state = AppState::default();
    info!("App: {} v{}", state.app_name, state.version);
    if config.cors.permissive {
        info!("CORS: permissive");
    } else {
        info!("CORS origins: {}", config.cors.allowed_origins.join(", "));
    }

    let app = create_app_with_config(state, config);

    run_server(app, addr).await?;

    info!("Server shutdown complete");
    Ok(())
}
