// HTTP server.
// Exposes the request-time resolver over Axum.

pub mod handler;

use std::net::SocketAddr;

use axum::{Router, routing::get};
use tracing::info;

use crate::resolver::CachedResolver;
use handler::{handle_health, handle_repo};

/// Path of the repository metadata endpoint.
pub const REPO_ROUTE: &str = "/api/github";

/// Build the router over a resolver.
pub fn router(resolver: CachedResolver) -> Router {
    Router::new()
        .route("/health", get(handle_health))
        .route(REPO_ROUTE, get(handle_repo))
        .with_state(resolver)
}

/// Bind and serve until the process receives ctrl-c.
pub async fn serve(resolver: CachedResolver, host: &str, port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let actual_addr = listener.local_addr()?;

    info!("Server listening on {}", actual_addr);

    axum::serve(listener, router(resolver))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received, exiting");
        })
        .await?;

    Ok(())
}
