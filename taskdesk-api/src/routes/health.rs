/// Health check endpoint
///
/// Public, unauthenticated. Reports whether the process is up and whether
/// the store answers a trivial probe. Deployment tooling polls this; it is
/// not part of the operation surface.

use crate::app::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use taskdesk_shared::db::pool;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: "ok" or "degraded"
    pub status: &'static str,

    /// Whether the database answered the probe
    pub database: bool,

    /// Server version
    pub version: &'static str,
}

/// `GET /health` handler
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = pool::health_check(&state.db).await.is_ok();

    let (status, code) = if database {
        ("ok", StatusCode::OK)
    } else {
        ("degraded", StatusCode::SERVICE_UNAVAILABLE)
    };

    (
        code,
        Json(HealthResponse {
            status,
            database,
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}
