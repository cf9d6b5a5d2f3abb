//! Core library for the feedback form service: models, validation, handlers and client.

pub mod client;
pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod validation;

pub use client::{ClientError, FeedbackClient, SubmissionReply};
pub use config::AppConfig;
pub use error::{AppError, Result};
pub use handlers::routes::create_routes;
pub use metrics::{StatsSnapshot, SubmissionMetrics};
pub use middleware::cors::{cors_layer_from_config, cors_layer_permissive};
pub use models::{FormSubmission, ResponseMessage, SubmissionOutcome};

use axum::Router;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub metrics: SubmissionMetrics,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            app_name: "Feedback Form Service".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            metrics: SubmissionMetrics::new(),
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    create_app_with_config(state, AppConfig::default())
}

pub fn create_app_with_config(state: AppState, config: AppConfig) -> Router {
    let mut router = create_routes();

    router = router.layer(middleware::cors::cors_layer_from_config(&config.cors));

    if config.logging.log_requests {
        router = router.layer(middleware::logging::logging_layer());
    }

    router.with_state(state)
}

pub async fn run_server(app: Router, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve(app, listener).await
}

/// Serves on an already bound listener until Ctrl+C or SIGTERM.
pub async fn serve(app: Router, listener: tokio::net::TcpListener) -> Result<()> {
    info!("Starting server on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
