//! HTTP handlers for the probe and metrics endpoints

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, instrument};

use crate::controller::metrics;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
#[instrument]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Prometheus scrape endpoint
pub async fn metrics_handler() -> Result<String, StatusCode> {
    metrics::encode_text().map_err(|e| {
        error!("Failed to encode metrics: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}
