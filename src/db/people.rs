//! Student and teacher rows.

use crate::errors::AppResult;
use crate::models::academic_year::YearScope;
use crate::models::person::{Student, Teacher};
use rusqlite::{Connection, OptionalExtension, Row, params};

const STUDENT_COLS: &str =
    "id, student_id, name, class, parent_phone, photo, academic_year_id, created_at";
const TEACHER_COLS: &str = "id, teacher_id, name, id_card_number, phone, sex, photo, created_at";

fn map_student(row: &Row) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        student_id: row.get(1)?,
        name: row.get(2)?,
        class: row.get(3)?,
        parent_phone: row.get(4)?,
        photo: row.get(5)?,
        academic_year_id: row.get(6)?,
        created_at: row.get(7)?,
    })
}

fn map_teacher(row: &Row) -> rusqlite::Result<Teacher> {
    Ok(Teacher {
        id: row.get(0)?,
        teacher_id: row.get(1)?,
        name: row.get(2)?,
        id_card_number: row.get(3)?,
        phone: row.get(4)?,
        sex: row.get(5)?,
        photo: row.get(6)?,
        created_at: row.get(7)?,
    })
}

// ---------------------------
// Students
// ---------------------------

pub fn find_student_by_code(conn: &Connection, code: &str) -> AppResult<Option<Student>> {
    let sql = format!("SELECT {STUDENT_COLS} FROM students WHERE student_id = ?1");
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.query_row([code], map_student).optional()?)
}

pub fn get_student(conn: &Connection, id: i64) -> AppResult<Option<Student>> {
    let sql = format!("SELECT {STUDENT_COLS} FROM students WHERE id = ?1");
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.query_row([id], map_student).optional()?)
}

/// Students in scope, ordered by class then name.
pub fn list_students(conn: &Connection, scope: YearScope) -> AppResult<Vec<Student>> {
    let sql = format!(
        "SELECT {STUDENT_COLS} FROM students
         WHERE (?1 IS NULL OR academic_year_id = ?1)
         ORDER BY class COLLATE NOCASE, name COLLATE NOCASE, id"
    );
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map([scope.year_id()], map_student)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_student(conn: &Connection, s: &Student) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO students
            (student_id, name, class, parent_phone, photo, academic_year_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            s.student_id,
            s.name,
            s.class,
            s.parent_phone,
            s.photo,
            s.academic_year_id,
            s.created_at
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Overwrite the editable fields. The code and created_at never change.
pub fn update_student(conn: &Connection, s: &Student) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE students
            SET name = ?1, class = ?2, parent_phone = ?3, photo = ?4, academic_year_id = ?5
          WHERE id = ?6",
        params![
            s.name,
            s.class,
            s.parent_phone,
            s.photo,
            s.academic_year_id,
            s.id
        ],
    )?;
    Ok(n)
}

pub fn delete_student(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM students WHERE id = ?1", [id])?)
}

pub fn count_students_in_year(conn: &Connection, year_id: i64) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM students WHERE academic_year_id = ?1",
        [year_id],
        |r| r.get(0),
    )?)
}

pub fn rename_class_on_students(conn: &Connection, old: &str, new: &str) -> AppResult<usize> {
    Ok(conn.execute(
        "UPDATE students SET class = ?1 WHERE class = ?2",
        params![new, old],
    )?)
}

// ---------------------------
// Teachers
// ---------------------------

pub fn find_teacher_by_code(conn: &Connection, code: &str) -> AppResult<Option<Teacher>> {
    let sql = format!("SELECT {TEACHER_COLS} FROM teachers WHERE teacher_id = ?1");
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.query_row([code], map_teacher).optional()?)
}

pub fn get_teacher(conn: &Connection, id: i64) -> AppResult<Option<Teacher>> {
    let sql = format!("SELECT {TEACHER_COLS} FROM teachers WHERE id = ?1");
    let mut stmt = conn.prepare_cached(&sql)?;
    Ok(stmt.query_row([id], map_teacher).optional()?)
}

pub fn list_teachers(conn: &Connection) -> AppResult<Vec<Teacher>> {
    let sql = format!("SELECT {TEACHER_COLS} FROM teachers ORDER BY name COLLATE NOCASE, id");
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map([], map_teacher)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn insert_teacher(conn: &Connection, t: &Teacher) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO teachers
            (teacher_id, name, id_card_number, phone, sex, photo, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            t.teacher_id,
            t.name,
            t.id_card_number,
            t.phone,
            t.sex,
            t.photo,
            t.created_at
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_teacher(conn: &Connection, t: &Teacher) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE teachers
            SET name = ?1, id_card_number = ?2, phone = ?3, sex = ?4, photo = ?5
          WHERE id = ?6",
        params![t.name, t.id_card_number, t.phone, t.sex, t.photo, t.id],
    )?;
    Ok(n)
}

pub fn delete_teacher(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM teachers WHERE id = ?1", [id])?)
}

// ---------------------------
// Code sequences
// ---------------------------

/// Highest numeric suffix among codes of `table.column` that start with `stem`.
/// Codes whose remainder is not all digits are ignored.
pub fn max_code_sequence(
    conn: &Connection,
    table: &str,
    column: &str,
    stem: &str,
) -> AppResult<i64> {
    let sql = format!("SELECT {column} FROM {table} WHERE substr({column}, 1, ?2) = ?1");
    let mut stmt = conn.prepare_cached(&sql)?;
    let rows = stmt.query_map(params![stem, stem.chars().count() as i64], |r| r.get::<_, String>(0))?;

    let mut max = 0;
    for r in rows {
        let code = r?;
        let Some(rest) = code.strip_prefix(stem) else {
            continue;
        };
        if !rest.is_empty()
            && rest.bytes().all(|b| b.is_ascii_digit())
            && let Ok(n) = rest.parse::<i64>()
        {
            max = max.max(n);
        }
    }
    Ok(max)
}
