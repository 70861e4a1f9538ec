//! Liveness endpoint. Never calls the upstream.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::http::server::AppState;
use crate::relay::response::timestamp;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub message: &'static str,
    pub upstream: String,
    pub timestamp: String,
}

pub async fn liveness(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok",
        message: "Relay running",
        upstream: state.relay.translator().base_address().to_string(),
        timestamp: timestamp(),
    })
}
