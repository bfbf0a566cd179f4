//! Salary Prediction API
//!
//! Loads the model artifact, then serves predictions over HTTP.

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};

use salary_api::telemetry::{init_metrics, init_tracing};
use salary_api::{create_router, AppState, Cli, ServiceConfig};
use salary_model::LoadedModel;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("Starting Salary Prediction API");

    let config = ServiceConfig::load(&cli.config, &cli)?;
    info!("Model artifact: {:?}", config.model_path);

    // The service cannot answer anything without a model
    let model = LoadedModel::load(config.model_config()).map_err(|e| {
        error!("Failed to load model: {}", e);
        e
    })?;

    let metrics_handle = init_metrics()?;
    let state = AppState::new(model.into_regressor()).with_metrics(metrics_handle);

    let addr: SocketAddr = config.bind_address().parse()?;
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            warn!("Shutdown signal received, stopping server...");
        })
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
