//! API-key guard for mutating endpoints.
//!
//! Active only when `server.api_key` (or `ATTENDLOG_API_KEY`) is set. Safe
//! methods pass through; everything else must carry the key either as
//! `Authorization: Bearer <key>` or as `X-API-Key: <key>`.

use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method};
use axum::middleware::Next;
use axum::response::Response;

use crate::errors::AppError;
use crate::server::state::AppState;

fn presented_key(headers: &HeaderMap) -> Option<&str> {
    if let Some(v) = headers.get("x-api-key").and_then(|v| v.to_str().ok()) {
        return Some(v.trim());
    }
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
}

pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.config.server.api_key.as_deref() else {
        return Ok(next.run(req).await);
    };

    if matches!(*req.method(), Method::GET | Method::HEAD | Method::OPTIONS) {
        return Ok(next.run(req).await);
    }

    let presented = presented_key(req.headers()).map(str::to_owned);
    match presented {
        Some(key) if key == expected => Ok(next.run(req).await),
        Some(_) => {
            tracing::warn!(method = %req.method(), path = %req.uri().path(), "rejected invalid API key");
            Err(AppError::Unauthorized("Invalid API key".into()))
        }
        None => Err(AppError::Unauthorized("Missing API key".into())),
    }
}
