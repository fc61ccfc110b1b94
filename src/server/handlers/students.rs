use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::core::{academic_year::resolve_scope, registry};
use crate::errors::AppResult;
use crate::models::person::{NewStudent, Student, StudentUpdate};
use crate::server::extract::{ApiJson, parse_id};
use crate::server::response::{Message, ok};
use crate::server::state::AppState;

/// A student as served to the front-end: the QR payload is the code itself.
#[derive(Serialize)]
pub struct StudentView {
    #[serde(flatten)]
    pub student: Student,
    pub qr_data: String,
}

impl From<Student> for StudentView {
    fn from(student: Student) -> Self {
        let qr_data = student.student_id.clone();
        Self { student, qr_data }
    }
}

#[derive(Serialize)]
pub struct StudentsResponse {
    pub academic_year_id: Option<i64>,
    pub students: Vec<StudentView>,
}

#[derive(Serialize)]
pub struct StudentResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub student: StudentView,
}

#[derive(Debug, Deserialize)]
pub struct StudentsQuery {
    pub academic_year_id: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(q): Query<StudentsQuery>,
) -> AppResult<impl IntoResponse> {
    let (scope, students) = state
        .pool
        .read(move |conn| {
            let scope = resolve_scope(conn, q.academic_year_id.as_deref())?;
            Ok((scope, registry::list_students(conn, scope)?))
        })
        .await?;

    Ok(ok(StudentsResponse {
        academic_year_id: scope.year_id(),
        students: students.into_iter().map(StudentView::from).collect(),
    }))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let student = state.pool.read(move |conn| registry::get_student(conn, id)).await?;
    Ok(ok(StudentResponse {
        message: None,
        student: student.into(),
    }))
}

pub async fn create(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<NewStudent>,
) -> AppResult<impl IntoResponse> {
    let prefix = state.code_prefix();
    let student = state
        .pool
        .write(move |conn| registry::create_student(conn, &prefix, body))
        .await?;

    tracing::info!(code = %student.student_id, "student registered");
    Ok(ok(StudentResponse {
        message: Some(format!("Student {} registered", student.name)),
        student: student.into(),
    }))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<StudentUpdate>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let student = state
        .pool
        .write(move |conn| registry::update_student(conn, id, body))
        .await?;
    Ok(ok(StudentResponse {
        message: Some(format!("Student {} updated", student.name)),
        student: student.into(),
    }))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let id = parse_id(&id)?;
    let student = state
        .pool
        .write(move |conn| registry::delete_student(conn, id))
        .await?;
    Ok(ok(Message {
        message: format!("Student {} deleted", student.name),
    }))
}
