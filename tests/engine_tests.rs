use attendlog::config::ClockSource;
use attendlog::core::aggregate::day_report;
use attendlog::core::calculator::classify::classify;
use attendlog::core::tracker::{TrackerOptions, check_in};
use attendlog::core::{academic_year, registry, settings};
use attendlog::db::attendance::{events_for_person_on, insert_event};
use attendlog::db::pool::DbPool;
use attendlog::errors::{AppError, is_unique_violation};
use attendlog::models::academic_year::YearScope;
use attendlog::models::check_in_type::CheckInType;
use attendlog::models::event::NewEvent;
use attendlog::models::person_kind::PersonKind;
use attendlog::models::status::AttendanceStatus;
use chrono::{NaiveDate, NaiveTime};
use std::thread;

mod common;
use common::{TestEnv, add_student, add_teacher, add_year};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, 6).expect("valid date")
}

fn at(h: u32, m: u32, s: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, s).expect("valid time")
}

fn opts() -> TrackerOptions {
    TrackerOptions {
        clock: ClockSource::Client,
        duplicate_window_secs: 60,
    }
}

fn scan(pool: &mut DbPool, code: &str, time: NaiveTime) -> Result<CheckInType, AppError> {
    check_in(&mut pool.conn, code, Some(day()), Some(time), opts(), "test")
        .map(|o| o.event.check_in_type)
}

#[test]
fn test_classify_boundary_is_present() {
    let c = classify(at(8, 0, 0), at(8, 0, 0));
    assert_eq!(c.status, AttendanceStatus::Present);
    assert_eq!(c.minutes_late, 0);

    let c = classify(at(7, 55, 0), at(8, 0, 0));
    assert_eq!(c.status, AttendanceStatus::Present);
    assert_eq!(c.minutes_late, 0);
}

#[test]
fn test_classify_counts_whole_minutes() {
    let c = classify(at(8, 17, 0), at(8, 0, 0));
    assert_eq!(c.status, AttendanceStatus::Late);
    assert_eq!(c.minutes_late, 17);

    let c = classify(at(8, 0, 30), at(8, 0, 0));
    assert_eq!(c.status, AttendanceStatus::Late);
    assert_eq!(c.minutes_late, 0);
}

#[test]
fn test_classify_is_monotonic() {
    let start = at(8, 0, 0);
    let mut prev = classify(at(6, 0, 0), start);

    for minute in (6 * 60 + 1)..(12 * 60) {
        let t = at(minute / 60, minute % 60, 0);
        let c = classify(t, start);
        assert!(c.minutes_late >= prev.minutes_late);
        if prev.status == AttendanceStatus::Late {
            assert_eq!(c.status, AttendanceStatus::Late);
        }
        prev = c;
    }
}

#[test]
fn test_day_state_moves_forward_only() {
    let env = TestEnv::new();
    let mut pool = env.pool();
    let alice = add_student(&mut pool, "Alice", "Form 1", None);

    assert_eq!(scan(&mut pool, &alice.student_id, at(7, 55, 0)).ok(), Some(CheckInType::Arrival));
    assert_eq!(scan(&mut pool, &alice.student_id, at(15, 10, 0)).ok(), Some(CheckInType::Departure));

    let third = scan(&mut pool, &alice.student_id, at(15, 30, 0));
    assert!(matches!(third, Err(AppError::Rejected(_))));

    let events = events_for_person_on(&pool.conn, PersonKind::Student, alice.id, day()).expect("events");
    assert_eq!(events.len(), 2);
    assert!(events[0].is_arrival());
    assert_eq!(events[0].status, Some(AttendanceStatus::Present));
    assert_eq!(events[0].minutes_late, Some(0));
    assert_eq!(events[1].status, None);
}

#[test]
fn test_departure_before_arrival_time_is_rejected() {
    let env = TestEnv::new();
    let mut pool = env.pool();
    let alice = add_student(&mut pool, "Alice", "Form 1", None);

    scan(&mut pool, &alice.student_id, at(9, 0, 0)).expect("arrival");
    let early = scan(&mut pool, &alice.student_id, at(8, 0, 0));
    assert!(matches!(early, Err(AppError::Rejected(_))));
}

#[test]
fn test_duplicate_window_suppresses_rapid_rescan() {
    let env = TestEnv::new();
    let mut pool = env.pool();
    let bob = add_student(&mut pool, "Bob", "Form 1", None);

    scan(&mut pool, &bob.student_id, at(8, 17, 0)).expect("arrival");
    let dup = scan(&mut pool, &bob.student_id, at(8, 17, 30));
    assert!(matches!(dup, Err(AppError::Rejected(_))));

    let events = events_for_person_on(&pool.conn, PersonKind::Student, bob.id, day()).expect("events");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].status, Some(AttendanceStatus::Late));
    assert_eq!(events[0].minutes_late, Some(17));
}

#[test]
fn test_concurrent_scans_serialize_per_day() {
    let env = TestEnv::new();
    let mut pool = env.pool();
    let alice = add_student(&mut pool, "Alice", "Form 1", None);
    drop(pool);

    // No duplicate window: only the write transaction keeps the scans apart.
    let no_window = TrackerOptions {
        duplicate_window_secs: 0,
        ..opts()
    };

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let db = env.db.clone();
            let code = alice.student_id.clone();
            thread::spawn(move || {
                let mut pool = DbPool::new(&db).expect("open db");
                check_in(&mut pool.conn, &code, Some(day()), Some(at(7, 58, 0)), no_window, "test")
                    .map(|o| o.event.check_in_type)
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("scan thread"))
        .collect();

    let recorded: Vec<CheckInType> = results.iter().filter_map(|r| r.as_ref().ok().copied()).collect();
    assert_eq!(recorded.len(), 2, "{results:?}");
    assert!(recorded.contains(&CheckInType::Arrival));
    assert!(recorded.contains(&CheckInType::Departure));
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(AppError::Rejected(_))))
            .count(),
        2
    );

    let pool = env.pool();
    let events = events_for_person_on(&pool.conn, PersonKind::Student, alice.id, day()).expect("events");
    assert_eq!(events.len(), 2);
    assert_eq!(events.iter().filter(|e| e.is_arrival()).count(), 1);
}

#[test]
fn test_store_refuses_second_arrival_row() {
    let env = TestEnv::new();
    let mut pool = env.pool();
    let alice = add_student(&mut pool, "Alice", "Form 1", None);

    let row = NewEvent {
        person_type: PersonKind::Student,
        person_id: alice.id,
        date: day(),
        check_in_type: CheckInType::Arrival,
        time: at(7, 50, 0),
        status: Some(AttendanceStatus::Present),
        minutes_late: Some(0),
        source: "test".into(),
    };
    insert_event(&pool.conn, &row).expect("first arrival");

    let second = insert_event(&pool.conn, &NewEvent { time: at(7, 51, 0), ..row.clone() });
    match second {
        Err(AppError::Db(ref e)) => assert!(is_unique_violation(e), "{e}"),
        other => panic!("expected a unique violation, got {other:?}"),
    }
}

#[test]
fn test_unknown_and_empty_codes() {
    let env = TestEnv::new();
    let mut pool = env.pool();

    assert!(matches!(
        scan(&mut pool, "GHOST", at(8, 0, 0)),
        Err(AppError::UnknownCode(_))
    ));
    assert!(matches!(
        scan(&mut pool, "   ", at(8, 0, 0)),
        Err(AppError::Validation(_))
    ));
}

#[test]
fn test_year_report_counts_and_absentees() {
    let env = TestEnv::new();
    let mut pool = env.pool();
    let year = add_year(&mut pool, "2025-2026", 2025, true);
    let other = add_year(&mut pool, "2024-2025", 2024, false);

    let a = add_student(&mut pool, "Alice", "Form 1", Some(year.id));
    let b = add_student(&mut pool, "Bob", "Form 1", Some(year.id));
    let c = add_student(&mut pool, "Carol", "Form 2", Some(year.id));
    let old = add_student(&mut pool, "Olga", "Form 5", Some(other.id));
    let t = add_teacher(&mut pool, "Mrs Ngo");

    scan(&mut pool, &a.student_id, at(7, 55, 0)).expect("alice");
    scan(&mut pool, &b.student_id, at(8, 17, 0)).expect("bob");
    scan(&mut pool, &old.student_id, at(7, 0, 0)).expect("olga");
    scan(&mut pool, &t.teacher_id, at(7, 30, 0)).expect("teacher");

    let report = day_report(&pool.conn, day(), YearScope::Year(year.id)).expect("report");
    let s = report.stats;

    assert_eq!(s.present, 1);
    assert_eq!(s.late, 1);
    assert_eq!(s.absent, 1);
    assert_eq!(s.total_roster, 3);
    assert_eq!(s.total_checked_in, 2);
    assert_eq!(s.teachers_checked_in, 1);
    assert_eq!(s.present + s.late + s.absent, s.total_roster);

    assert_eq!(report.absent_students.len(), 1);
    assert_eq!(report.absent_students[0].student_id, c.student_id);
    assert!(report.entries.iter().all(|e| e.name != "Olga"));

    let all = day_report(&pool.conn, day(), YearScope::All).expect("report all");
    assert_eq!(all.stats.total_roster, 4);
    assert_eq!(all.stats.present + all.stats.late, 3);
}

#[test]
fn test_absent_students_sorted_by_class_then_name() {
    let env = TestEnv::new();
    let mut pool = env.pool();

    add_student(&mut pool, "zoe", "Form 2", None);
    add_student(&mut pool, "Adam", "Form 2", None);
    add_student(&mut pool, "Yann", "form 1", None);

    let report = day_report(&pool.conn, day(), YearScope::All).expect("report");
    let names: Vec<_> = report.absent_students.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["Yann", "Adam", "zoe"]);
}

#[test]
fn test_student_codes_follow_year_and_sequence() {
    let env = TestEnv::new();
    let mut pool = env.pool();
    let year = add_year(&mut pool, "2025-2026", 2025, true);

    let a = add_student(&mut pool, "Alice", "Form 1", None);
    let b = add_student(&mut pool, "Bob", "Form 1", Some(year.id));
    assert_eq!(a.student_id, "MPASAT2501");
    assert_eq!(b.student_id, "MPASAT2502");
    assert_eq!(a.academic_year_id, Some(year.id));

    let yy = chrono::Local::now().format("%y").to_string();
    let t = add_teacher(&mut pool, "Mrs Ngo");
    assert_eq!(t.teacher_id, format!("MPASATT{yy}01"));
}

#[test]
fn test_only_one_active_year() {
    let env = TestEnv::new();
    let mut pool = env.pool();

    let first = add_year(&mut pool, "2024-2025", 2024, true);
    let second = add_year(&mut pool, "2025-2026", 2025, true);

    let years = academic_year::list(&pool.conn).expect("years");
    assert_eq!(years.iter().filter(|y| y.is_active()).count(), 1);
    assert!(academic_year::get(&pool.conn, second.id).expect("second").is_active());

    academic_year::activate(&mut pool.conn, first.id).expect("activate");
    assert!(academic_year::get(&pool.conn, first.id).expect("first").is_active());
    assert!(!academic_year::get(&pool.conn, second.id).expect("second").is_active());

    let dup = add_year_result(&mut pool, "2024-2025");
    assert!(matches!(dup, Err(AppError::Rejected(_))));
}

fn add_year_result(
    pool: &mut DbPool,
    name: &str,
) -> Result<attendlog::models::academic_year::AcademicYear, AppError> {
    academic_year::create(
        &mut pool.conn,
        attendlog::models::academic_year::NewAcademicYear {
            name: name.to_string(),
            start_year: 2030,
            end_year: 2031,
            status: None,
        },
    )
}

#[test]
fn test_scope_resolution() {
    let env = TestEnv::new();
    let mut pool = env.pool();

    assert_eq!(academic_year::resolve_scope(&pool.conn, None).expect("scope"), YearScope::All);

    let year = add_year(&mut pool, "2025-2026", 2025, true);
    assert_eq!(
        academic_year::resolve_scope(&pool.conn, None).expect("scope"),
        YearScope::Year(year.id)
    );
    assert_eq!(
        academic_year::resolve_scope(&pool.conn, Some("all")).expect("scope"),
        YearScope::All
    );
    assert!(matches!(
        academic_year::resolve_scope(&pool.conn, Some("999")),
        Err(AppError::NotFound { .. })
    ));
    assert!(matches!(
        academic_year::resolve_scope(&pool.conn, Some("x")),
        Err(AppError::Validation(_))
    ));
}

#[test]
fn test_year_delete_blocked_while_students_remain() {
    let env = TestEnv::new();
    let mut pool = env.pool();
    let year = add_year(&mut pool, "2025-2026", 2025, true);
    let s = add_student(&mut pool, "Alice", "Form 1", Some(year.id));

    let blocked = academic_year::delete(&mut pool.conn, year.id);
    assert!(matches!(blocked, Err(AppError::Rejected(_))));

    registry::delete_student(&mut pool.conn, s.id).expect("delete student");
    academic_year::delete(&mut pool.conn, year.id).expect("delete year");
}

#[test]
fn test_deleting_student_removes_their_events() {
    let env = TestEnv::new();
    let mut pool = env.pool();
    let alice = add_student(&mut pool, "Alice", "Form 1", None);

    scan(&mut pool, &alice.student_id, at(7, 55, 0)).expect("arrival");
    registry::delete_student(&mut pool.conn, alice.id).expect("delete");

    let events = events_for_person_on(&pool.conn, PersonKind::Student, alice.id, day()).expect("events");
    assert!(events.is_empty());
    assert!(matches!(
        scan(&mut pool, &alice.student_id, at(15, 0, 0)),
        Err(AppError::UnknownCode(_))
    ));
}

#[test]
fn test_class_rename_moves_students() {
    let env = TestEnv::new();
    let mut pool = env.pool();

    let class = registry::create_class(
        &mut pool.conn,
        attendlog::models::school_class::ClassInput {
            name: "Form 1".into(),
            code: "F1".into(),
        },
    )
    .expect("class");
    let alice = add_student(&mut pool, "Alice", "Form 1", None);

    registry::update_class(
        &mut pool.conn,
        class.id,
        attendlog::models::school_class::ClassInput {
            name: "Form 1A".into(),
            code: "F1A".into(),
        },
    )
    .expect("rename");

    let alice = registry::get_student(&pool.conn, alice.id).expect("student");
    assert_eq!(alice.class, "Form 1A");
}

#[test]
fn test_settings_validation_keeps_stored_values() {
    let env = TestEnv::new();
    let mut pool = env.pool();

    let bad_order = settings::set(&mut pool.conn, "09:00", "08:00");
    assert!(matches!(bad_order, Err(AppError::Rejected(_))));

    let malformed = settings::set(&mut pool.conn, "8am", "15:00");
    assert!(matches!(malformed, Err(AppError::InvalidTime(_)) | Err(AppError::Validation(_))));

    let times = settings::get(&pool.conn).expect("settings");
    assert_eq!(times.school_start_time, at(8, 0, 0));
    assert_eq!(times.school_end_time, at(15, 0, 0));

    settings::set(&mut pool.conn, "07:30", "14:00").expect("set");
    assert_eq!(settings::get(&pool.conn).expect("settings").school_start_time, at(7, 30, 0));
}

#[test]
fn test_phone_validation() {
    assert!(registry::validate_phone("677123456").is_ok());
    assert!(registry::validate_phone("+237 677-123-456").is_ok());
    assert!(registry::validate_phone("12345678").is_err());
    assert!(registry::validate_phone("1234567890123456").is_err());
    assert!(registry::validate_phone("67712345a").is_err());
}
