use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde::Serialize;

use crate::core::registry;
use crate::errors::AppResult;
use crate::models::person::{NewTeacher, Teacher, TeacherUpdate};
use crate::server::extract::{ApiJson, parse_id};
use crate::server::response::{Message, ok};
use crate::server::state::AppState;

#[derive(Serialize)]
pub struct TeacherView {
    #[serde(flatten)]
    pub teacher: Teacher,
    pub qr_data: String,
}

impl From<Teacher> for TeacherView {
    fn from(teacher: Teacher) -> Self {
        let qr_data = teacher.teacher_id.clone();
        Self { teacher, qr_data }
    }
}

#[derive(Serialize)]
pub struct TeachersResponse {
    pub teachers: Vec<TeacherView>,
}

#[derive(Serialize)]
pub struct TeacherResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub teacher: TeacherView,
}

pub async fn list(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let teachers = state.pool.read(|conn| registry::list_teachers(conn)).await?;
    Ok(ok(TeachersResponse {
        teachers: teachers.into_iter().map(TeacherView::from).collect(),
    }))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let teacher = state.pool.read(move |conn| registry::get_teacher(conn, id)).await?;
    Ok(ok(TeacherResponse {
        message: None,
        teacher: teacher.into(),
    }))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewTeacher>,
) -> AppResult<impl IntoResponse> {
    let prefix = state.code_prefix();
    let teacher = state
        .pool
        .write(move |conn| registry::create_teacher(conn, &prefix, body))
        .await?;

    tracing::info!(code = %teacher.teacher_id, "teacher registered");
    Ok(ok(TeacherResponse {
        message: Some(format!("Teacher {} registered", teacher.name)),
        teacher: teacher.into(),
    }))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<TeacherUpdate>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let teacher = state
        .pool
        .write(move |conn| registry::update_teacher(conn, id, body))
        .await?;
    Ok(ok(TeacherResponse {
        message: Some(format!("Teacher {} updated", teacher.name)),
        teacher: teacher.into(),
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let teacher = state
        .pool
        .write(move |conn| registry::delete_teacher(conn, id))
        .await?;
    Ok(ok(Message {
        message: format!("Teacher {} deleted", teacher.name),
    }))
}
