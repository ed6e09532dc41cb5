//! Route handlers for the relay's public surface.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;

use crate::http::request::X_REQUEST_ID;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::upstream::gateway::ForwardError;

/// Body accepted by both proxy operations. The connection test ignores
/// `prompt`.
#[derive(Debug, Deserialize)]
pub struct ProxyRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub colab_url: String,
}

#[derive(Serialize)]
pub struct ServiceStatus {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Liveness probe.
pub async fn get_status() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        status: "Local Backend Running",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /proxy/generate` — forward a generation request to the Colab
/// instance named in the body.
pub async fn proxy_generate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ProxyRequest>,
) -> Result<Json<Value>, ForwardError> {
    let start = Instant::now();
    tracing::debug!(
        request_id = request_id_from(&headers),
        "Generation request accepted"
    );

    let result = state
        .gateway
        .generate(&request.prompt, &request.colab_url)
        .await;
    metrics::record_forward("generate", status_of(&result), start);
    result.map(Json)
}

/// `POST /proxy/test` — check that the Colab URL answers with JSON.
pub async fn proxy_test(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ProxyRequest>,
) -> Result<Json<Value>, ForwardError> {
    let start = Instant::now();
    tracing::debug!(
        request_id = request_id_from(&headers),
        "Connection test accepted"
    );

    let result = state.gateway.test_connection(&request.colab_url).await;
    metrics::record_forward("test", status_of(&result), start);
    result.map(Json)
}

fn request_id_from(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

fn status_of(result: &Result<Value, ForwardError>) -> u16 {
    match result {
        Ok(_) => 200,
        Err(error) => error.status_code().as_u16(),
    }
}
