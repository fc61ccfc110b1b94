use attendlog::config::Config;
use attendlog::db::pool::SharedPool;
use attendlog::server::build_router;
use attendlog::server::state::AppState;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

mod common;
use common::TestEnv;

const DAY: &str = "2025-10-06";

fn app_with(env: &TestEnv, api_key: Option<&str>) -> Router {
    drop(env.pool()); // migrate

    let mut config = Config::default();
    config.database = env.db.clone();
    config.server.api_key = api_key.map(str::to_string);

    let pool = SharedPool::open(&env.db).expect("shared pool");
    build_router(AppState::new(pool, config)).expect("router")
}

fn app(env: &TestEnv) -> Router {
    app_with(env, None)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request");

    let resp = app.clone().oneshot(req).await.expect("response");
    let status = resp.status();
    let bytes = resp.into_body().collect().await.expect("body").to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn create_year(app: &Router, name: &str, start: i32, status: &str) -> i64 {
    let (s, body) = send(
        app,
        "POST",
        "/api/academic-years",
        Some(json!({"name": name, "start_year": start, "end_year": start + 1, "status": status})),
    )
    .await;
    assert_eq!(s, StatusCode::OK, "{body}");
    body["academic_year"]["id"].as_i64().expect("year id")
}

async fn create_student(app: &Router, name: &str, class: &str) -> String {
    let (s, body) = send(
        app,
        "POST",
        "/api/students",
        Some(json!({"name": name, "class": class, "parent_phone": "677123456"})),
    )
    .await;
    assert_eq!(s, StatusCode::OK, "{body}");
    body["student"]["qr_data"].as_str().expect("qr_data").to_string()
}

async fn checkin(app: &Router, code: &str, time: &str) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        "/api/attendance/checkin",
        Some(json!({"qr_data": code, "client_date": DAY, "client_time": time})),
    )
    .await
}

#[tokio::test]
async fn test_health_reports_database() {
    let env = TestEnv::new();
    let app = app(&env);

    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["db_healthy"], true);
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_checkin_flow_arrival_departure_rejected() {
    let env = TestEnv::new();
    let app = app(&env);
    let code = create_student(&app, "Alice", "Form 1").await;

    let (status, body) = checkin(&app, &code, "07:55:00").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["success"], true);
    assert_eq!(body["person_type"], "student");
    assert_eq!(body["check_in_type"], "arrival");
    assert_eq!(body["status"], "present");
    assert_eq!(body["minutes_late"], 0);
    assert_eq!(body["attendance"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["attendance"][0]["name"], "Alice");
    assert_eq!(body["attendance"][0]["class"], "Form 1");
    assert_eq!(body["attendance"][0]["status"], "present");

    let (status, body) = checkin(&app, &code, "15:10:00").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["check_in_type"], "departure");
    assert!(body.get("status").is_none());
    assert_eq!(body["attendance"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["attendance"][1]["check_in_type"], "departure");
    assert_eq!(body["attendance"][1]["name"], "Alice");
    assert_eq!(body["attendance"][1]["class"], "Form 1");
    assert_eq!(body["attendance"][1]["student_id"], code.as_str());

    let (status, body) = checkin(&app, &code, "15:30:00").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert!(body["message"].as_str().unwrap_or_default().contains("twice"));
}

#[tokio::test]
async fn test_checkin_late_arrival() {
    let env = TestEnv::new();
    let app = app(&env);
    let code = create_student(&app, "Bob", "Form 1").await;

    let (status, body) = checkin(&app, &code, "08:17").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "late");
    assert_eq!(body["minutes_late"], 17);
    assert_eq!(body["check_in_time"], "08:17:00");
}

#[tokio::test]
async fn test_checkin_unknown_code_is_404() {
    let env = TestEnv::new();
    let app = app(&env);

    let (status, body) = checkin(&app, "NOBODY", "08:00").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid code: NOBODY");
}

#[tokio::test]
async fn test_checkin_malformed_time_is_400_and_stores_nothing() {
    let env = TestEnv::new();
    let app = app(&env);
    let code = create_student(&app, "Alice", "Form 1").await;

    let (status, body) = checkin(&app, &code, "25:99").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (_, entries) = send(&app, "GET", &format!("/api/attendance/entries?date={DAY}"), None).await;
    assert_eq!(entries["entries"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_invalid_json_body_uses_error_envelope() {
    let env = TestEnv::new();
    let app = app(&env);

    let req = Request::builder()
        .method("POST")
        .uri("/api/attendance/checkin")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let resp = app.clone().oneshot(req).await.expect("response");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let bytes = resp.into_body().collect().await.expect("body").to_bytes();
    let body: Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_settings_rejects_inverted_times() {
    let env = TestEnv::new();
    let app = app(&env);

    let (status, body) = send(&app, "GET", "/api/settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["settings"]["school_start_time"], "08:00");
    assert_eq!(body["settings"]["school_end_time"], "15:00");

    let (status, body) = send(
        &app,
        "PUT",
        "/api/settings",
        Some(json!({"school_start_time": "09:00", "school_end_time": "08:00"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/settings",
        Some(json!({"school_start_time": "9am", "school_end_time": "15:00"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, "GET", "/api/settings", None).await;
    assert_eq!(body["settings"]["school_start_time"], "08:00");

    let (status, body) = send(
        &app,
        "PUT",
        "/api/settings",
        Some(json!({"school_start_time": "07:30", "school_end_time": "14:30"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["settings"]["school_start_time"], "07:30");
}

#[tokio::test]
async fn test_report_for_year_with_absentee() {
    let env = TestEnv::new();
    let app = app(&env);
    let year = create_year(&app, "2025-2026", 2025, "active").await;

    let a = create_student(&app, "Alice", "Form 1").await;
    let b = create_student(&app, "Bob", "Form 1").await;
    let c = create_student(&app, "Carol", "Form 2").await;

    checkin(&app, &a, "07:55").await;
    checkin(&app, &b, "08:17").await;

    let uri = format!("/api/attendance/report?date={DAY}&academic_year_id={year}");
    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["present"], 1);
    assert_eq!(body["late"], 1);
    assert_eq!(body["absent"], 1);
    assert_eq!(body["total"], 3);
    assert_eq!(body["total_roster"], 3);
    assert_eq!(body["total_checked_in"], 2);
    assert_eq!(body["absentStudents"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["absentStudents"][0]["student_id"], c.as_str());

    let uri = format!("/api/attendance/stats?date={DAY}&total=checked_in");
    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["academic_year_id"], year);
    assert_eq!(body["total"], 2);
    assert_eq!(body["entries"].as_array().map(Vec::len), Some(2));

    let (status, _) = send(&app, "GET", "/api/attendance/stats?total=everyone", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "GET", "/api/attendance/report?academic_year_id=999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_report_export_download() {
    let env = TestEnv::new();
    let app = app(&env);
    let code = create_student(&app, "Alice", "Form 1").await;
    checkin(&app, &code, "07:55").await;

    let req = Request::builder()
        .uri(format!("/api/attendance/report/export?date={DAY}&format=csv"))
        .body(Body::empty())
        .expect("request");
    let resp = app.clone().oneshot(req).await.expect("response");
    assert_eq!(resp.status(), StatusCode::OK);

    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(disposition.contains("attendance-report-2025-10-06.csv"));

    let bytes = resp.into_body().collect().await.expect("body").to_bytes();
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains(&code));
    assert!(text.contains("present"));

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/attendance/report/export?date={DAY}&format=docx"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_all_attendance() {
    let env = TestEnv::new();
    let app = app(&env);
    let code = create_student(&app, "Alice", "Form 1").await;
    checkin(&app, &code, "07:55").await;
    checkin(&app, &code, "15:00").await;

    let (status, body) = send(&app, "DELETE", "/api/attendance/all?academic_year_id=all", None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["deleted"], 2);

    let (_, entries) = send(&app, "GET", &format!("/api/attendance/entries?date={DAY}"), None).await;
    assert_eq!(entries["entries"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_delete_all_for_one_year_keeps_other_years_and_teachers() {
    let env = TestEnv::new();
    let app = app(&env);
    let old_year = create_year(&app, "2024-2025", 2024, "inactive").await;
    let new_year = create_year(&app, "2025-2026", 2025, "active").await;

    let mut codes = Vec::new();
    for (name, year) in [("Alice", old_year), ("Bob", new_year)] {
        let (s, body) = send(
            &app,
            "POST",
            "/api/students",
            Some(json!({"name": name, "class": "Form 1", "parent_phone": "677123456", "academic_year_id": year})),
        )
        .await;
        assert_eq!(s, StatusCode::OK, "{body}");
        codes.push(body["student"]["qr_data"].as_str().expect("qr_data").to_string());
    }
    let (s, body) = send(
        &app,
        "POST",
        "/api/teachers",
        Some(json!({"name": "Mrs Ngo", "id_card_number": "CM-1", "phone": "699000111", "sex": "F"})),
    )
    .await;
    assert_eq!(s, StatusCode::OK, "{body}");
    let teacher = body["teacher"]["qr_data"].as_str().expect("qr").to_string();

    checkin(&app, &codes[0], "07:50").await;
    checkin(&app, &codes[0], "15:00").await;
    checkin(&app, &codes[1], "07:55").await;
    checkin(&app, &teacher, "07:40").await;

    let uri = format!("/api/attendance/all?academic_year_id={old_year}");
    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["deleted"], 2);

    let uri = format!("/api/attendance/entries?date={DAY}&academic_year_id=all");
    let (_, body) = send(&app, "GET", &uri, None).await;
    let entries = body["entries"].as_array().cloned().unwrap_or_default();
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().any(|e| e["name"] == "Bob"));
    assert!(entries.iter().any(|e| e["person_type"] == "teacher"));
    assert!(entries.iter().all(|e| e["name"] != "Alice"));
}

#[tokio::test]
async fn test_registry_crud() {
    let env = TestEnv::new();
    let app = app(&env);
    let year = create_year(&app, "2025-2026", 2025, "active").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/classes",
        Some(json!({"name": "Form 1", "code": "F1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let class_id = body["class"]["id"].as_i64().expect("class id");

    let (status, _) = send(
        &app,
        "POST",
        "/api/classes",
        Some(json!({"name": "Form 1", "code": "F1"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let code = create_student(&app, "Alice", "Form 1").await;
    assert_eq!(code, "MPASAT2501");

    let (status, body) = send(&app, "GET", &format!("/api/students?academic_year_id={year}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["students"].as_array().map(Vec::len), Some(1));
    let student_id = body["students"][0]["id"].as_i64().expect("student id");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/classes/{class_id}"),
        Some(json!({"name": "Form 1A", "code": "F1A"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let (_, body) = send(&app, "GET", &format!("/api/students/{student_id}"), None).await;
    assert_eq!(body["student"]["class"], "Form 1A");

    let (status, _) = send(
        &app,
        "POST",
        "/api/students",
        Some(json!({"name": "Bad", "class": "Form 1", "parent_phone": "12"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "DELETE", &format!("/api/academic-years/{year}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, "DELETE", &format!("/api/students/{student_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", &format!("/api/students/{student_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &format!("/api/academic-years/{year}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/api/students/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_teacher_checkin_has_no_attendance_array() {
    let env = TestEnv::new();
    let app = app(&env);

    let (status, body) = send(
        &app,
        "POST",
        "/api/teachers",
        Some(json!({"name": "Mrs Ngo", "id_card_number": "CM-1", "phone": "699000111", "sex": "F"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let code = body["teacher"]["qr_data"].as_str().expect("qr").to_string();

    let (status, body) = checkin(&app, &code, "07:40").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["person_type"], "teacher");
    assert!(body.get("attendance").is_none());

    let (_, body) = send(&app, "GET", &format!("/api/attendance/stats?date={DAY}"), None).await;
    assert_eq!(body["teachers_checked_in"], 1);
    assert_eq!(body["present"], 0);
}

#[tokio::test]
async fn test_api_key_guards_mutations_only() {
    let env = TestEnv::new();
    let app = app_with(&env, Some("s3cret"));

    let (status, body) = send(&app, "GET", "/api/settings", None).await;
    assert_eq!(status, StatusCode::OK, "{body}");

    let body = json!({"school_start_time": "07:30", "school_end_time": "14:30"});
    let (status, resp) = send(&app, "PUT", "/api/settings", Some(body.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(resp["success"], false);

    let req = Request::builder()
        .method("PUT")
        .uri("/api/settings")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, "Bearer wrong")
        .body(Body::from(body.to_string()))
        .expect("request");
    let resp = app.clone().oneshot(req).await.expect("response");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .method("PUT")
        .uri("/api/settings")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-api-key", "s3cret")
        .body(Body::from(body.to_string()))
        .expect("request");
    let resp = app.clone().oneshot(req).await.expect("response");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let env = TestEnv::new();
    let app = app(&env);

    let req = Request::builder().uri("/health").body(Body::empty()).expect("request");
    let resp = app.clone().oneshot(req).await.expect("response");
    assert!(resp.headers().contains_key("x-request-id"));
}
