//! Liveness endpoint, mounted at the root rather than under `/api/v1` so
//! load balancers and uptime checks need no versioned path.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `"ok"` when the database answers, `"degraded"` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

/// `GET /health`
///
/// Always returns 200; a broken database shows up in the body, not the
/// status code, so probes can distinguish "down" from "up but degraded".
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = slotswap_db::health_check(&state.pool).await.is_ok();

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
