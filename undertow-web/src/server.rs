//! Server bootstrap for the Undertow streaming endpoint.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tracing::info;
use undertow_core::UndertowConfig;
use undertow_core::swarm::SwarmEngine;

use crate::handlers::stream_magnet;

/// Shared state for all streaming requests.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<dyn SwarmEngine>,
    config: UndertowConfig,
}

impl AppState {
    pub fn new(engine: Arc<dyn SwarmEngine>, config: UndertowConfig) -> Self {
        Self { engine, config }
    }

    pub fn engine(&self) -> &dyn SwarmEngine {
        self.engine.as_ref()
    }

    pub fn config(&self) -> &UndertowConfig {
        &self.config
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/stream", get(stream_magnet))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds the listener and serves requests until shutdown.
///
/// The swarm engine is injected by the caller; production deployments hand
/// in a real engine, the CLI hands in the simulated one.
///
/// # Errors
///
/// - `UndertowError::Io` - The listener could not bind or serving failed
pub async fn run_server(
    config: UndertowConfig,
    engine: Arc<dyn SwarmEngine>,
) -> undertow_core::Result<()> {
    let addr = config.server.bind_address;
    let app = router(AppState::new(engine, config));

    info!("undertow streaming server listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
