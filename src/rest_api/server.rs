//! Axum HTTP server for probes and metrics

use std::net::SocketAddr;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{Error, Result};

use super::handlers;

pub fn router() -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics_handler))
        .layer(TraceLayer::new_for_http())
}

/// Serve [`router`] on `addr` until the process exits
pub async fn run_server(addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::ConfigError(format!("Failed to bind {addr}: {e}")))?;

    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router())
        .await
        .map_err(|e| Error::ConfigError(format!("HTTP server error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest_api::HealthResponse;

    #[tokio::test]
    async fn test_health_and_metrics_endpoints() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router()).await.unwrap();
        });

        let base = format!("http://{addr}");
        let health: HealthResponse = reqwest::get(format!("{base}/health"))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(health.status, "healthy");

        let resp = reqwest::get(format!("{base}/metrics")).await.unwrap();
        assert!(resp.status().is_success());
    }
}
