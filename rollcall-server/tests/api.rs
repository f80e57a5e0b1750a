//! Router-level integration tests
//!
//! Drives the full axum app (middleware included) against a throwaway
//! work dir and database.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::util::ServiceExt;

use rollcall_server::api::build_app;
use rollcall_server::auth::{JwtConfig, JwtService, LOGIN_PATH};
use rollcall_server::core::config::SmtpConfig;
use rollcall_server::core::{Config, ServerState};
use rollcall_server::db::DbService;
use rollcall_server::db::models::{AttendanceCreate, EmployeeCreate, Role, UserCreate};
use rollcall_server::db::repository::{
    AttendanceRepository, EmployeeRepository, UserRepository,
};
use rollcall_server::services::{FaceClient, Mailer};

struct TestApp {
    app: Router,
    state: ServerState,
    _dir: TempDir,
}

async fn spawn_app() -> TestApp {
    let dir = TempDir::new().expect("temp dir");
    let work_dir = dir.path().to_string_lossy().into_owned();

    let mut config = Config::with_overrides(work_dir, 0);
    config.smtp = SmtpConfig {
        host: "smtp.invalid".to_string(),
        port: 587,
        username: None,
        password: None,
        from: "no-reply@rollcall.local".to_string(),
    };
    config.jwt = JwtConfig {
        secret: "integration-test-secret-at-least-32-bytes".to_string(),
        expiration_minutes: 60,
        issuer: "rollcall-server".to_string(),
        audience: "rollcall-clients".to_string(),
    };
    config.ensure_work_dir_structure().expect("work dir");

    let db = DbService::new(&config.database_path()).await.expect("db");
    let jwt = Arc::new(JwtService::with_config(config.jwt.clone()));
    // Point the face client at a closed port; failures must degrade to warnings
    let face = FaceClient::new("http://127.0.0.1:1/add_face".to_string(), 1);
    let mailer = Mailer::from_config(&config.smtp);

    let state = ServerState::new(config, db.pool.clone(), jwt, face, mailer);
    TestApp {
        app: build_app(state.clone()),
        state,
        _dir: dir,
    }
}

async fn create_console_user(state: &ServerState, username: &str, role: Role) {
    UserRepository::new(state.db.clone())
        .create(UserCreate {
            username: username.to_string(),
            password: "test-pass".to_string(),
            role,
            employee_id: None,
        })
        .await
        .expect("create user");
}

async fn login(app: &Router, username: &str) -> String {
    let body = serde_json::json!({"username": username, "password": "test-pass"});
    let response = app
        .clone()
        .oneshot(
            Request::post("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    json["token"].as_str().expect("token").to_string()
}

fn get(path: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(path: &str, token: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(path)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn console_routes_redirect_without_principal() {
    let test = spawn_app().await;

    // No token at all: silent redirect, not a 401
    let response = test
        .app
        .clone()
        .oneshot(get("/api/admin/employees", None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        LOGIN_PATH
    );
}

#[tokio::test]
async fn employee_role_is_redirected_from_console() {
    let test = spawn_app().await;
    create_console_user(&test.state, "worker", Role::Employee).await;
    let token = login(&test.app, "worker").await;

    let response = test
        .app
        .clone()
        .oneshot(get("/api/admin/employees", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    // Mobile routes still work for the same token
    let response = test
        .app
        .clone()
        .oneshot(get("/api/attendance/stats/summary", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn manager_can_use_console() {
    let test = spawn_app().await;
    create_console_user(&test.state, "manager", Role::Manager).await;
    let token = login(&test.app, "manager").await;

    let response = test
        .app
        .clone()
        .oneshot(get("/api/admin/devices", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn device_creation_generates_api_key() {
    let test = spawn_app().await;
    create_console_user(&test.state, "admin2", Role::Admin).await;
    let token = login(&test.app, "admin2").await;

    let response = test
        .app
        .clone()
        .oneshot(post_json(
            "/api/admin/devices",
            &token,
            serde_json::json!({"name": "Front gate", "location": "Lobby"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let device = json_body(response).await;
    assert!(!device["api_key"].as_str().unwrap().is_empty());
    assert!(device["last_seen"].is_string());
}

#[tokio::test]
async fn check_in_is_deduplicated_per_day() {
    let test = spawn_app().await;
    create_console_user(&test.state, "admin3", Role::Admin).await;
    let token = login(&test.app, "admin3").await;

    let employee = EmployeeRepository::new(test.state.db.clone())
        .create(EmployeeCreate {
            name: "Alice".to_string(),
            department: None,
            role: None,
            phone: None,
            email: None,
            photo_path: None,
            face_embedding: None,
        })
        .await
        .unwrap();

    let payload = serde_json::json!({"employee_id": employee.id});
    let first = json_body(
        test.app
            .clone()
            .oneshot(post_json("/api/attendance", &token, payload.clone()))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(first["success"], true);
    assert_eq!(first["already_checked_in"], false);

    let second = json_body(
        test.app
            .clone()
            .oneshot(post_json("/api/attendance", &token, payload))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(second["success"], false);
    assert_eq!(second["already_checked_in"], true);
    assert_eq!(second["attendance_id"], first["attendance_id"]);
}

fn multipart_employee(token: &str, name: &str, phone: &str, email: &str) -> Request<Body> {
    let boundary = "X-ROLLCALL-TEST-BOUNDARY";
    let mut body = String::new();
    for (field, value) in [("name", name), ("phone", phone), ("email", email)] {
        body.push_str(&format!(
            "--{boundary}\r\ncontent-disposition: form-data; name=\"{field}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{boundary}--\r\n"));

    Request::post("/api/admin/employees")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn employee_create_flow_with_best_effort_side_effects() {
    let test = spawn_app().await;
    create_console_user(&test.state, "admin4", Role::Admin).await;
    let token = login(&test.app, "admin4").await;

    let response = test
        .app
        .clone()
        .oneshot(multipart_employee(
            &token,
            "Trần Thị B",
            "0901112222",
            "b@example.com",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let created = json_body(response).await;
    assert_eq!(created["employee"]["name"], "Trần Thị B");
    // SMTP is unconfigured: the email outcome is a warning, not a failure
    let warnings = created["warnings"].as_array().unwrap();
    assert!(warnings.iter().any(|w| w["source"] == "email"));

    // The companion account exists with the phone as username
    let account = UserRepository::new(test.state.db.clone())
        .find_by_username("0901112222")
        .await
        .unwrap()
        .expect("companion account");
    assert_eq!(account.role, Role::Employee);

    // A second employee with the same phone is rejected before any write
    let before = EmployeeRepository::new(test.state.db.clone())
        .count()
        .await
        .unwrap();
    let response = test
        .app
        .clone()
        .oneshot(multipart_employee(
            &token,
            "Someone Else",
            "0901112222",
            "other@example.com",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let after = EmployeeRepository::new(test.state.db.clone())
        .count()
        .await
        .unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn report_lifecycle_survives_missing_artifact() {
    let test = spawn_app().await;
    create_console_user(&test.state, "admin5", Role::Admin).await;
    let token = login(&test.app, "admin5").await;

    // Some data to report on
    let employee = EmployeeRepository::new(test.state.db.clone())
        .create(EmployeeCreate {
            name: "Báo Cáo, \"Test\"".to_string(),
            department: Some("QA".to_string()),
            role: None,
            phone: None,
            email: None,
            photo_path: None,
            face_embedding: None,
        })
        .await
        .unwrap();
    AttendanceRepository::new(test.state.db.clone())
        .create(AttendanceCreate {
            employee_id: employee.id,
            timestamp_in: Some(
                chrono::NaiveDate::from_ymd_opt(2026, 8, 6)
                    .unwrap()
                    .and_hms_opt(8, 15, 0)
                    .unwrap(),
            ),
            status: Some("late".to_string()),
            photo_path: None,
            device_id: None,
        })
        .await
        .unwrap();

    // Generate
    let response = test
        .app
        .clone()
        .oneshot(post_json(
            "/api/admin/reports",
            &token,
            serde_json::json!({"type": "Attendance"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let report = json_body(response).await;
    let report_id = report["id"].as_i64().unwrap();
    let file_path = report["file_path"].as_str().unwrap().to_string();

    // The artifact exists and starts with the UTF-8 BOM
    let artifact = test
        .state
        .work_dir()
        .join(file_path.trim_start_matches('/'));
    let bytes = std::fs::read(&artifact).expect("artifact written");
    assert!(bytes.starts_with(rollcall_server::reports::UTF8_BOM));
    let text = String::from_utf8(bytes[3..].to_vec()).expect("valid UTF-8");
    assert!(text.contains(r#""Báo Cáo, ""Test""""#));

    // Download serves CSV with the original filename
    let response = test
        .app
        .clone()
        .oneshot(get(
            &format!("/api/admin/reports/{report_id}/download"),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/csv; charset=utf-8"
    );

    // Remove the backing file by hand; deletion must still succeed
    std::fs::remove_file(&artifact).unwrap();
    let response = test
        .app
        .clone()
        .oneshot(
            Request::delete(format!("/api/admin/reports/{report_id}"))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Row is gone, download now 404s
    let response = test
        .app
        .clone()
        .oneshot(get(
            &format!("/api/admin/reports/{report_id}/download"),
            Some(&token),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
