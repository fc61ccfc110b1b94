use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde::Serialize;

use crate::core::academic_year;
use crate::errors::AppResult;
use crate::models::academic_year::{AcademicYear, AcademicYearUpdate, NewAcademicYear};
use crate::server::extract::{ApiJson, parse_id};
use crate::server::response::{Message, ok};
use crate::server::state::AppState;

#[derive(Serialize)]
pub struct YearsResponse {
    pub academic_years: Vec<AcademicYear>,
}

#[derive(Serialize)]
pub struct YearResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub academic_year: AcademicYear,
}

pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let academic_years = state.pool.read(|conn| academic_year::list(conn)).await?;
    Ok(ok(YearsResponse { academic_years }))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let year = state.pool.read(move |conn| academic_year::get(conn, id)).await?;
    Ok(ok(YearResponse {
        message: None,
        academic_year: year,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewAcademicYear>,
) -> AppResult<impl IntoResponse> {
    let year = state
        .pool
        .write(move |conn| academic_year::create(conn, body))
        .await?;
    Ok(ok(YearResponse {
        message: Some(format!("Academic year {} created", year.name)),
        academic_year: year,
    }))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<AcademicYearUpdate>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let year = state
        .pool
        .write(move |conn| academic_year::update(conn, id, body))
        .await?;
    Ok(ok(YearResponse {
        message: Some(format!("Academic year {} updated", year.name)),
        academic_year: year,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let year = state
        .pool
        .write(move |conn| academic_year::delete(conn, id))
        .await?;
    Ok(ok(Message {
        message: format!("Academic year {} deleted", year.name),
    }))
}
