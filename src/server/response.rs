//! Response envelope shared by every JSON endpoint: `{ "success": true, ...payload }`.

use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
}

/// Wrap a payload in a successful envelope.
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        data,
    })
}

/// `{ "success": true, "message": ... }`
#[derive(Debug, Serialize)]
pub struct Message {
    pub message: String,
}
