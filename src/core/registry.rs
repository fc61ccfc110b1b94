//! Registry of students, teachers and classes.
//!
//! External codes are generated here, once, at registration:
//! `{prefix}{yy}{nn}` for students and `{prefix}T{yy}{nn}` for teachers, where
//! `yy` is the two-digit start year of the student's academic year (the
//! current year when none applies) and `nn` the next free sequence number.

use crate::db::{attendance, classes, log::ttlog, people, years};
use crate::errors::{AppError, AppResult, is_unique_violation};
use crate::models::academic_year::YearScope;
use crate::models::person::{NewStudent, NewTeacher, Student, StudentUpdate, Teacher, TeacherUpdate};
use crate::models::person_kind::PersonKind;
use crate::models::school_class::{ClassInput, SchoolClass};
use chrono::{Datelike, Local};
use rusqlite::{Connection, TransactionBehavior};

// ---------------------------
// Validation helpers
// ---------------------------

fn required(field: &str, value: &str) -> AppResult<String> {
    let v = value.trim();
    if v.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(v.to_string())
}

/// Phone numbers carry 9 to 15 digits. Spaces, dashes and a leading `+` are allowed.
pub fn validate_phone(raw: &str) -> AppResult<String> {
    let phone = raw.trim();
    let body = phone.strip_prefix('+').unwrap_or(phone);

    let mut digits = 0;
    for c in body.chars() {
        match c {
            '0'..='9' => digits += 1,
            ' ' | '-' => {}
            _ => {
                return Err(AppError::Validation(format!(
                    "Phone number contains invalid characters: {raw}"
                )));
            }
        }
    }

    if !(9..=15).contains(&digits) {
        return Err(AppError::Validation(format!(
            "Phone number must have 9 to 15 digits: {raw}"
        )));
    }
    Ok(phone.to_string())
}

fn clean_photo(photo: Option<String>) -> Option<String> {
    photo.filter(|p| !p.trim().is_empty())
}

fn duplicate(e: AppError, what: String) -> AppError {
    match e {
        AppError::Db(ref db) if is_unique_violation(db) => {
            AppError::Rejected(format!("{what} already exists"))
        }
        other => other,
    }
}

// ---------------------------
// Codes
// ---------------------------

/// Build the next free code for `kind` with the given two-digit year.
pub fn next_code(conn: &Connection, prefix: &str, kind: PersonKind, yy: i32) -> AppResult<String> {
    let marker = if kind.is_student() { "" } else { "T" };
    let stem = format!("{}{}{:02}", prefix.trim(), marker, yy.rem_euclid(100));

    let (table, column) = match kind {
        PersonKind::Student => ("students", "student_id"),
        PersonKind::Teacher => ("teachers", "teacher_id"),
    };
    let seq = people::max_code_sequence(conn, table, column, &stem)? + 1;

    Ok(format!("{stem}{seq:02}"))
}

fn current_yy() -> i32 {
    Local::now().year() % 100
}

// ---------------------------
// Students
// ---------------------------

pub fn list_students(conn: &Connection, scope: YearScope) -> AppResult<Vec<Student>> {
    people::list_students(conn, scope)
}

pub fn get_student(conn: &Connection, id: i64) -> AppResult<Student> {
    people::get_student(conn, id)?.ok_or_else(|| AppError::not_found("Student", id))
}

pub fn create_student(conn: &mut Connection, prefix: &str, input: NewStudent) -> AppResult<Student> {
    let name = required("Name", &input.name)?;
    let class = required("Class", &input.class)?;
    let parent_phone = validate_phone(&input.parent_phone)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let year = match input.academic_year_id {
        Some(id) => Some(
            years::get_year(&tx, id)?.ok_or_else(|| AppError::not_found("Academic year", id))?,
        ),
        None => years::active_year(&tx)?,
    };
    let yy = year.as_ref().map(|y| y.start_year % 100).unwrap_or_else(current_yy);

    let mut student = Student {
        id: 0,
        student_id: next_code(&tx, prefix, PersonKind::Student, yy)?,
        name,
        class,
        parent_phone,
        photo: clean_photo(input.photo),
        academic_year_id: year.map(|y| y.id),
        created_at: Local::now().to_rfc3339(),
    };

    student.id = people::insert_student(&tx, &student)
        .map_err(|e| duplicate(e, format!("Student code {}", student.student_id)))?;
    ttlog(&tx, "register", &student.student_id, &format!("Student {} registered", student.name))?;
    tx.commit()?;

    Ok(student)
}

pub fn update_student(conn: &mut Connection, id: i64, patch: StudentUpdate) -> AppResult<Student> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let mut s = people::get_student(&tx, id)?.ok_or_else(|| AppError::not_found("Student", id))?;

    if let Some(name) = patch.name {
        s.name = required("Name", &name)?;
    }
    if let Some(class) = patch.class {
        s.class = required("Class", &class)?;
    }
    if let Some(phone) = patch.parent_phone {
        s.parent_phone = validate_phone(&phone)?;
    }
    if let Some(photo) = patch.photo {
        s.photo = clean_photo(Some(photo));
    }
    if let Some(year_id) = patch.academic_year_id {
        if years::get_year(&tx, year_id)?.is_none() {
            return Err(AppError::not_found("Academic year", year_id));
        }
        s.academic_year_id = Some(year_id);
    }

    people::update_student(&tx, &s)?;
    ttlog(&tx, "edit", &s.student_id, &format!("Student {} updated", s.name))?;
    tx.commit()?;

    Ok(s)
}

/// Delete a student together with all of their attendance events.
pub fn delete_student(conn: &mut Connection, id: i64) -> AppResult<Student> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let s = people::get_student(&tx, id)?.ok_or_else(|| AppError::not_found("Student", id))?;

    let events = attendance::delete_for_person(&tx, PersonKind::Student, id)?;
    people::delete_student(&tx, id)?;
    ttlog(
        &tx,
        "del",
        &s.student_id,
        &format!("Student {} deleted with {} attendance event(s)", s.name, events),
    )?;
    tx.commit()?;

    Ok(s)
}

// ---------------------------
// Teachers
// ---------------------------

pub fn list_teachers(conn: &Connection) -> AppResult<Vec<Teacher>> {
    people::list_teachers(conn)
}

pub fn get_teacher(conn: &Connection, id: i64) -> AppResult<Teacher> {
    people::get_teacher(conn, id)?.ok_or_else(|| AppError::not_found("Teacher", id))
}

pub fn create_teacher(conn: &mut Connection, prefix: &str, input: NewTeacher) -> AppResult<Teacher> {
    let name = required("Name", &input.name)?;
    let id_card_number = required("ID card number", &input.id_card_number)?;
    let phone = validate_phone(&input.phone)?;
    let sex = required("Sex", &input.sex)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let mut teacher = Teacher {
        id: 0,
        teacher_id: next_code(&tx, prefix, PersonKind::Teacher, current_yy())?,
        name,
        id_card_number,
        phone,
        sex,
        photo: clean_photo(input.photo),
        created_at: Local::now().to_rfc3339(),
    };

    teacher.id = people::insert_teacher(&tx, &teacher)
        .map_err(|e| duplicate(e, format!("Teacher code {}", teacher.teacher_id)))?;
    ttlog(&tx, "register", &teacher.teacher_id, &format!("Teacher {} registered", teacher.name))?;
    tx.commit()?;

    Ok(teacher)
}

pub fn update_teacher(conn: &mut Connection, id: i64, patch: TeacherUpdate) -> AppResult<Teacher> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let mut t = people::get_teacher(&tx, id)?.ok_or_else(|| AppError::not_found("Teacher", id))?;

    if let Some(name) = patch.name {
        t.name = required("Name", &name)?;
    }
    if let Some(card) = patch.id_card_number {
        t.id_card_number = required("ID card number", &card)?;
    }
    if let Some(phone) = patch.phone {
        t.phone = validate_phone(&phone)?;
    }
    if let Some(sex) = patch.sex {
        t.sex = required("Sex", &sex)?;
    }
    if let Some(photo) = patch.photo {
        t.photo = clean_photo(Some(photo));
    }

    people::update_teacher(&tx, &t)?;
    ttlog(&tx, "edit", &t.teacher_id, &format!("Teacher {} updated", t.name))?;
    tx.commit()?;

    Ok(t)
}

pub fn delete_teacher(conn: &mut Connection, id: i64) -> AppResult<Teacher> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let t = people::get_teacher(&tx, id)?.ok_or_else(|| AppError::not_found("Teacher", id))?;

    let events = attendance::delete_for_person(&tx, PersonKind::Teacher, id)?;
    people::delete_teacher(&tx, id)?;
    ttlog(
        &tx,
        "del",
        &t.teacher_id,
        &format!("Teacher {} deleted with {} attendance event(s)", t.name, events),
    )?;
    tx.commit()?;

    Ok(t)
}

// ---------------------------
// Classes
// ---------------------------

pub fn list_classes(conn: &Connection) -> AppResult<Vec<SchoolClass>> {
    classes::list_classes(conn)
}

pub fn create_class(conn: &mut Connection, input: ClassInput) -> AppResult<SchoolClass> {
    let mut class = SchoolClass {
        id: 0,
        name: required("Class name", &input.name)?,
        code: required("Class code", &input.code)?,
        created_at: Local::now().to_rfc3339(),
    };

    let tx = conn.transaction()?;
    class.id = classes::insert_class(&tx, &class)
        .map_err(|e| duplicate(e, format!("Class '{}' or code '{}'", class.name, class.code)))?;
    ttlog(&tx, "class_add", &class.name, "Class created")?;
    tx.commit()?;

    Ok(class)
}

/// Edit a class. A rename is carried over to the students of that class.
pub fn update_class(conn: &mut Connection, id: i64, input: ClassInput) -> AppResult<SchoolClass> {
    let name = required("Class name", &input.name)?;
    let code = required("Class code", &input.code)?;

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let mut class = classes::get_class(&tx, id)?.ok_or_else(|| AppError::not_found("Class", id))?;
    let old_name = std::mem::replace(&mut class.name, name);
    class.code = code;

    classes::update_class(&tx, &class)
        .map_err(|e| duplicate(e, format!("Class '{}' or code '{}'", class.name, class.code)))?;

    let mut message = "Class updated".to_string();
    if old_name != class.name {
        let moved = people::rename_class_on_students(&tx, &old_name, &class.name)?;
        message = format!("Class renamed from '{old_name}', {moved} student(s) updated");
    }
    ttlog(&tx, "class_edit", &class.name, &message)?;
    tx.commit()?;

    Ok(class)
}

/// Delete a class. Students keep their class label.
pub fn delete_class(conn: &mut Connection, id: i64) -> AppResult<SchoolClass> {
    let tx = conn.transaction()?;
    let class = classes::get_class(&tx, id)?.ok_or_else(|| AppError::not_found("Class", id))?;
    classes::delete_class(&tx, id)?;
    ttlog(&tx, "class_del", &class.name, "Class deleted")?;
    tx.commit()?;

    Ok(class)
}
