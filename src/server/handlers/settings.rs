use axum::extract::State;
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::core::settings;
use crate::errors::AppResult;
use crate::models::settings::SchoolTimes;
use crate::server::extract::ApiJson;
use crate::server::response::ok;
use crate::server::state::AppState;

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub settings: SchoolTimes,
}

/// Raw `HH:MM` strings; parsed by the settings store so that malformed
/// values come back as `400` rather than a JSON rejection.
#[derive(Debug, Deserialize)]
pub struct SettingsRequest {
    #[serde(default)]
    pub school_start_time: String,
    #[serde(default)]
    pub school_end_time: String,
}

pub async fn get_settings(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let settings = state.pool.read(|conn| settings::get(conn)).await?;
    Ok(ok(SettingsResponse {
        message: None,
        settings,
    }))
}

pub async fn put_settings(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<SettingsRequest>,
) -> AppResult<impl IntoResponse> {
    let settings = state
        .pool
        .write(move |conn| settings::set(conn, &body.school_start_time, &body.school_end_time))
        .await?;

    tracing::info!(
        start = %settings.school_start_time.format("%H:%M"),
        end = %settings.school_end_time.format("%H:%M"),
        "school times updated"
    );

    Ok(ok(SettingsResponse {
        message: Some("Settings saved".into()),
        settings,
    }))
}
