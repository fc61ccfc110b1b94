use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::db::stats::ping;
use crate::server::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
    pub version: String,
    pub db_healthy: bool,
}

/// GET /health
///
/// Always answers 200; `db_healthy` tells whether a read connection could
/// be opened and queried.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = state.pool.read(|conn| Ok(ping(conn))).await.unwrap_or(false);

    Json(HealthResponse {
        success: true,
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        db_healthy,
    })
}
