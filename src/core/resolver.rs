use crate::db::people;
use crate::errors::{AppError, AppResult};
use crate::models::person::Person;
use rusqlite::Connection;

/// Map a scanned code to the student or teacher that owns it.
/// Students are looked up first, then teachers; both lookups hit a unique index.
pub fn resolve(conn: &Connection, code: &str) -> AppResult<Person> {
    let code = code.trim();
    if code.is_empty() {
        return Err(AppError::Validation("QR code is empty".into()));
    }

    if let Some(s) = people::find_student_by_code(conn, code)? {
        return Ok(Person::Student(s));
    }
    if let Some(t) = people::find_teacher_by_code(conn, code)? {
        return Ok(Person::Teacher(t));
    }

    Err(AppError::UnknownCode(code.to_string()))
}
