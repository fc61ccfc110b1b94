use crate::db::{log::ttlog, people, years};
use crate::errors::{AppError, AppResult, is_unique_violation};
use crate::models::academic_year::{
    AcademicYear, AcademicYearUpdate, NewAcademicYear, YearScope, YearStatus,
};
use chrono::Local;
use rusqlite::{Connection, TransactionBehavior};

/// Resolve the `academic_year_id` request parameter into a scope.
///
/// - `<id>`  → that year (NotFound if unknown)
/// - `all`   → every student
/// - absent  → the active year, or every student when none is active
pub fn resolve_scope(conn: &Connection, raw: Option<&str>) -> AppResult<YearScope> {
    match raw.map(str::trim) {
        None | Some("") => Ok(years::active_year(conn)?
            .map(|y| YearScope::Year(y.id))
            .unwrap_or(YearScope::All)),
        Some(v) if v.eq_ignore_ascii_case("all") => Ok(YearScope::All),
        Some(v) => {
            let id: i64 = v
                .parse()
                .map_err(|_| AppError::Validation(format!("Invalid academic_year_id: {v}")))?;
            match years::get_year(conn, id)? {
                Some(_) => Ok(YearScope::Year(id)),
                None => Err(AppError::not_found("Academic year", id)),
            }
        }
    }
}

fn validate(name: &str, start_year: i32, end_year: i32) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("Academic year name is required".into()));
    }
    if !(1900..=9999).contains(&start_year) || !(1900..=9999).contains(&end_year) {
        return Err(AppError::Validation(format!(
            "Years must be four-digit values, got {start_year}-{end_year}"
        )));
    }
    if start_year >= end_year {
        return Err(AppError::Validation(format!(
            "Start year {start_year} must be before end year {end_year}"
        )));
    }
    Ok(())
}

fn map_unique(e: AppError, name: &str) -> AppError {
    match e {
        AppError::Db(ref db) if is_unique_violation(db) => {
            AppError::Rejected(format!("Academic year '{name}' already exists"))
        }
        other => other,
    }
}

pub fn list(conn: &Connection) -> AppResult<Vec<AcademicYear>> {
    years::list_years(conn)
}

pub fn get(conn: &Connection, id: i64) -> AppResult<AcademicYear> {
    years::get_year(conn, id)?.ok_or_else(|| AppError::not_found("Academic year", id))
}

pub fn create(conn: &mut Connection, input: NewAcademicYear) -> AppResult<AcademicYear> {
    validate(&input.name, input.start_year, input.end_year)?;

    let status = input.status.unwrap_or(YearStatus::Inactive);
    let mut year = AcademicYear {
        id: 0,
        name: input.name.trim().to_string(),
        start_year: input.start_year,
        end_year: input.end_year,
        status,
        created_at: Local::now().to_rfc3339(),
    };

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    if status == YearStatus::Active {
        years::demote_others(&tx, 0)?;
    }
    year.id = years::insert_year(&tx, &year).map_err(|e| map_unique(e, &year.name))?;
    ttlog(&tx, "year_add", &year.name, "Academic year created")?;
    tx.commit()?;

    Ok(year)
}

pub fn update(conn: &mut Connection, id: i64, patch: AcademicYearUpdate) -> AppResult<AcademicYear> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let mut year = years::get_year(&tx, id)?.ok_or_else(|| AppError::not_found("Academic year", id))?;

    if let Some(name) = patch.name {
        year.name = name.trim().to_string();
    }
    if let Some(s) = patch.start_year {
        year.start_year = s;
    }
    if let Some(e) = patch.end_year {
        year.end_year = e;
    }
    if let Some(status) = patch.status {
        year.status = status;
    }
    validate(&year.name, year.start_year, year.end_year)?;

    if year.is_active() {
        years::demote_others(&tx, id)?;
    }
    years::update_year(&tx, &year).map_err(|e| map_unique(e, &year.name))?;
    ttlog(&tx, "year_edit", &year.name, "Academic year updated")?;
    tx.commit()?;

    Ok(year)
}

/// Make `id` the only active year.
pub fn activate(conn: &mut Connection, id: i64) -> AppResult<AcademicYear> {
    update(
        conn,
        id,
        AcademicYearUpdate {
            status: Some(YearStatus::Active),
            ..AcademicYearUpdate::default()
        },
    )
}

/// Delete a year. Rejected while students still reference it.
pub fn delete(conn: &mut Connection, id: i64) -> AppResult<AcademicYear> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let year = years::get_year(&tx, id)?.ok_or_else(|| AppError::not_found("Academic year", id))?;

    let students = people::count_students_in_year(&tx, id)?;
    if students > 0 {
        return Err(AppError::Rejected(format!(
            "Academic year '{}' still has {} student(s)",
            year.name, students
        )));
    }

    years::delete_year(&tx, id)?;
    ttlog(&tx, "year_del", &year.name, "Academic year deleted")?;
    tx.commit()?;

    Ok(year)
}
