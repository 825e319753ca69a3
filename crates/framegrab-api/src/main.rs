mod error;
mod handlers;
mod router;
mod services;
mod state;
mod telemetry;

use framegrab_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    telemetry::init_telemetry().map_err(|e| anyhow::anyhow!(e.to_string()))?;

    // Initialize the application state (storage backend, pipeline)
    let state = state::AppState::from_config(config).await?;
    let app = router::build_router(state.clone());

    // Start the server
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], state.config.server_port));
    tracing::info!(%addr, environment = %state.config.environment, "Starting framegrab API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
