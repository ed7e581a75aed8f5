//! REST API exposing the calculation engine.
//!
//! Provides two endpoints:
//! - `POST /calculate`: size and price a proposal (`?mode=strict|lenient`)
//! - `GET /constants`: coefficients the server calculates with

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::estimate::Calculator;

/// Immutable application state shared across all request handlers.
///
/// The calculator holds no mutable state, so no locks are needed.
pub struct AppState {
    pub calculator: Calculator,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/calculate", post(handlers::post_calculate))
        .route("/constants", get(handlers::get_constants))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
