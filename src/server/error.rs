use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::errors::AppError;

impl AppError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::UnknownCode(_) | AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Rejected(_) => StatusCode::CONFLICT,
            AppError::InvalidDate(_)
            | AppError::InvalidTime(_)
            | AppError::Validation(_)
            | AppError::InvalidExportFormat(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Every failure leaves as `{ "success": false, "message": ... }`.
/// Infrastructure errors are logged and replaced by a generic message.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Internal error");
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let body = json!({
            "success": false,
            "message": message,
        });

        (status, axum::Json(body)).into_response()
    }
}
