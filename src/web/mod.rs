// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Health-check HTTP service

use axum::{response::Json, routing::get, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::WebConfig;
use crate::VaultError;

/// Body of `GET /health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Create the web application router
pub fn create_router() -> Router {
    Router::new()
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "vaultctl ready",
    })
}

/// Bind to the configured address and serve until the process exits
pub async fn start_server(config: &WebConfig) -> crate::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Health endpoint available at http://{}/health", addr);

    axum::serve(listener, create_router()).await
        .map_err(|e| VaultError::Server(format!("Server error: {}", e)))?;

    Ok(())
}
