use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde::Serialize;

use crate::core::registry;
use crate::errors::AppResult;
use crate::models::school_class::{ClassInput, SchoolClass};
use crate::server::extract::{ApiJson, parse_id};
use crate::server::response::{Message, ok};
use crate::server::state::AppState;

#[derive(Serialize)]
pub struct ClassesResponse {
    pub classes: Vec<SchoolClass>,
}

#[derive(Serialize)]
pub struct ClassResponse {
    pub message: String,
    pub class: SchoolClass,
}

pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let classes = state.pool.read(|conn| registry::list_classes(conn)).await?;
    Ok(ok(ClassesResponse { classes }))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<ClassInput>,
) -> AppResult<impl IntoResponse> {
    let class = state
        .pool
        .write(move |conn| registry::create_class(conn, body))
        .await?;
    Ok(ok(ClassResponse {
        message: format!("Class {} created", class.name),
        class,
    }))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<ClassInput>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let class = state
        .pool
        .write(move |conn| registry::update_class(conn, id, body))
        .await?;
    Ok(ok(ClassResponse {
        message: format!("Class {} updated", class.name),
        class,
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let class = state
        .pool
        .write(move |conn| registry::delete_class(conn, id))
        .await?;
    Ok(ok(Message {
        message: format!("Class {} deleted", class.name),
    }))
}
