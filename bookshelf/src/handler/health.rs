//! # Health handlers
//!
//! Liveness and readiness probes for load balancers and orchestrators.
//!
//! ```text
//! GET /health        -> {"status":"healthy","version":"0.1.0"}
//! GET /health/ready  -> {"status":"ready","checks":{"store":"ok"}}
//! ```

use std::{collections::HashMap, sync::Arc};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::AppState;

/// Liveness response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"healthy"` while the process can answer
    pub status: String,
    /// Crate version from Cargo.toml
    pub version: String,
}

/// Result of one readiness check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessStatus {
    Ready,
    NotReady,
}

/// Readiness response
#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: ReadinessStatus,
    pub checks: HashMap<String, CheckStatus>,
}

/// Liveness probe. Never touches the store.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Readiness probe.
///
/// Pings the store, connecting it first if needed. Responds 503 when the store
/// cannot be reached.
#[tracing::instrument(skip_all)]
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store = match state.catalog.ping().await {
        Ok(()) => CheckStatus::Ok,
        Err(err) => {
            tracing::warn!(error = %err, "store is not ready");
            CheckStatus::Error
        }
    };

    let (status_code, status) = match store {
        CheckStatus::Ok => (StatusCode::OK, ReadinessStatus::Ready),
        CheckStatus::Error => (StatusCode::SERVICE_UNAVAILABLE, ReadinessStatus::NotReady),
    };

    let checks = HashMap::from([("store".to_string(), store)]);

    (status_code, Json(ReadinessResponse { status, checks }))
}
