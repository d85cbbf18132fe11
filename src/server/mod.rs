//! HTTP server for mob-acesso
//!
//! Exposes search, reverse geocoding and routing to UI clients.

pub mod routes;
pub mod state;

use crate::clock::Clock;
use crate::error::{Error, Result};
use routes::create_router;
use state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Serve `state` on `addr`
///
/// Never returns unless the server shuts down
pub async fn serve<C: Clock + 'static>(addr: &str, state: Arc<AppState<C>>) -> Result<()> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| Error::Server(format!("Invalid server address: {}", e)))?;

    let app = create_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Server(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Server(format!("Server error: {}", e)))?;

    Ok(())
}
