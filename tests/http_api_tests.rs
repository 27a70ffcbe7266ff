//! HTTP client tests against a wiremock backend.
//!
//! The client is blocking, so each call runs inside `spawn_blocking`.

use barcode_attendance_client::{
    api::{
        ApiError, AttendanceApi, AttendanceEvent, AttendanceRequest, Credentials,
        HttpAttendanceApi,
    },
    identity::ScannedIdentity,
    screens::{HomeScreen, LoginScreen, Notification, Screen},
    scanner::PermissionState,
};

use serde_json::json;
use std::time::Duration;
use wiremock::{
    matchers::{body_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn credentials(password: &str) -> Credentials {
    Credentials {
        user_name: "admin".to_owned(),
        password: password.to_owned(),
    }
}

async fn login(server: &MockServer, credentials: Credentials) -> Result<(), ApiError> {
    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        let api = HttpAttendanceApi::new(&uri, Duration::from_secs(5)).unwrap();
        api.login(&credentials)
    })
    .await
    .unwrap()
}

async fn record(server: &MockServer, request: AttendanceRequest) -> Result<(), ApiError> {
    let uri = server.uri();
    tokio::task::spawn_blocking(move || {
        let api = HttpAttendanceApi::new(&uri, Duration::from_secs(5)).unwrap();
        api.record(&request)
    })
    .await
    .unwrap()
}

fn scanned(payload: &str) -> ScannedIdentity {
    ScannedIdentity::from_payload(payload).unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_success_posts_credentials() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/faculty/login"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"userName": "admin", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "abc"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut screen = LoginScreen::new();
    let credentials = screen.begin("admin", "secret").unwrap();
    let result = login(&mock_server, credentials).await;
    assert!(result.is_ok());

    let outcome = screen.complete(result);
    assert_eq!(outcome.navigate_to, Some(Screen::Home));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_rejected_stays_on_login() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/faculty/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "nope"})))
        .mount(&mock_server)
        .await;

    let result = login(&mock_server, credentials("wrong")).await;
    assert!(matches!(
        result,
        Err(ApiError::Rejected { status: 401, .. })
    ));

    let mut screen = LoginScreen::new();
    screen.begin("admin", "wrong").unwrap();
    let outcome = screen.complete(result);
    assert_eq!(outcome.navigate_to, None);
    assert_eq!(outcome.notification, Notification::error("Invalid Credentials"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_with_non_json_success_body_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/faculty/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&mock_server)
        .await;

    let result = login(&mock_server, credentials("secret")).await;
    assert!(matches!(result, Err(ApiError::MalformedResponse { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_unreachable_backend_is_a_transport_error() {
    let result = tokio::task::spawn_blocking(|| {
        // Nothing listens on the discard port.
        let api = HttpAttendanceApi::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        api.login(&credentials("secret"))
    })
    .await
    .unwrap();

    let err = result.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert!(!err.is_rejection());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_student_entry_posts_exactly_roll_number() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/students/entryStudent"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"rollNumber": "R1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"saved": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut home = HomeScreen::new();
    home.permission_resolved(PermissionState::Granted);
    home.scan(r#"{"user":"student","name":"A","rollNumber":"R1"}"#);
    assert_eq!(home.view().identity_lines, vec!["Name: A", "Roll Number: R1"]);

    let request = home.begin(AttendanceEvent::Entry).unwrap();
    let result = record(&mock_server, request).await;
    assert_eq!(
        home.complete(result),
        Some(Notification::info("Entry Time Saved"))
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_faculty_exit_posts_backend_spelling() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/faculty/exitFaculty"))
        .and(body_json(json!({"emplyoeeId": "E7"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let faculty = scanned(r#"{"user":"faculty","name":"B","emplyoeeId":"E7"}"#);
    let result = record(
        &mock_server,
        AttendanceRequest::new(AttendanceEvent::Exit, &faculty),
    )
    .await;

    // An empty 2xx body still counts as saved.
    assert!(result.is_ok());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_entry_shows_invalid_details() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/faculty/entryFaculty"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "unknown"})))
        .mount(&mock_server)
        .await;

    let mut home = HomeScreen::new();
    home.permission_resolved(PermissionState::Granted);
    home.scan(r#"{"user":"faculty","name":"B","employeeId":"E404"}"#);

    let request = home.begin(AttendanceEvent::Entry).unwrap();
    let result = record(&mock_server, request).await;
    assert!(matches!(result, Err(ApiError::Rejected { status: 404, .. })));
    assert_eq!(home.complete(result), Some(Notification::error("Invalid Details")));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_repeated_taps_each_send_a_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/students/exitStudent"))
        .and(body_json(json!({"rollNumber": "R1"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&mock_server)
        .await;

    let mut home = HomeScreen::new();
    home.permission_resolved(PermissionState::Granted);
    home.scan(r#"{"user":"student","name":"A","rollNumber":"R1"}"#);

    for _ in 0..3 {
        let request = home.begin(AttendanceEvent::Exit).unwrap();
        let result = record(&mock_server, request).await;
        assert_eq!(
            home.complete(result),
            Some(Notification::info("Exit Time Saved"))
        );
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_numeric_roll_number_is_posted_as_a_number() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/students/entryStudent"))
        .and(body_json(json!({"rollNumber": 12345})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let student = scanned(r#"{"user":"student","name":"A","rollNumber":12345}"#);
    let result = record(
        &mock_server,
        AttendanceRequest::new(AttendanceEvent::Entry, &student),
    )
    .await;
    assert!(result.is_ok());
}
