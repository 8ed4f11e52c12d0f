use kyc_review_server::logging::init_logging;
use kyc_review_server::{build_router, AppState, ServerConfig};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = ServerConfig::load()?;
    init_logging(&config.log)?;

    let state = AppState::from_config(&config).await?;
    let app = build_router(state, config.request_timeout());

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "KYC review server listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
