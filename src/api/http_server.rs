// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::{DefaultBodyLimit, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::predict::predict_handler;
use crate::classifier::ClassifierAdapter;

/// Headroom for multipart boundaries and headers on top of the file limit
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared, read-only state handed to every handler
#[derive(Clone)]
pub struct AppState {
    /// Model and label table, loaded once at startup
    pub classifier: Arc<ClassifierAdapter>,
    /// Largest accepted image upload
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(classifier: Arc<ClassifierAdapter>, max_upload_bytes: usize) -> Self {
        Self {
            classifier,
            max_upload_bytes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub labels: usize,
    pub input_size: u32,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelsResponse {
    pub labels: Vec<String>,
}

/// Build the node's router
pub fn create_router(state: AppState) -> Router {
    let body_limit = state
        .max_upload_bytes
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/health", get(health_handler))
        .route("/labels", get(labels_handler))
        .route("/predict", post(predict_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Serve until Ctrl+C
pub async fn start_server(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    let addr: SocketAddr = listener.local_addr()?;
    let app = create_router(state);

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        model: state.classifier.model_name().to_string(),
        labels: state.classifier.labels().len(),
        input_size: state.classifier.input_size(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn labels_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(LabelsResponse {
        labels: state
            .classifier
            .labels()
            .iter()
            .map(str::to_string)
            .collect(),
    })
}
