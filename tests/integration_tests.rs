use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use tower::ServiceExt;
use uuid::Uuid;

use frontdesk::config::AppConfig;
use frontdesk::handlers;
use frontdesk::records::RecordLog;
use frontdesk::services::geocode::{AddressLookup, AddressMatch, LookupStatus};
use frontdesk::services::mail::MailTransport;
use frontdesk::state::AppState;

// ── Mock Providers ──

struct MockLookup {
    status: LookupStatus,
}

impl MockLookup {
    fn matching() -> Self {
        Self {
            status: LookupStatus::Match(AddressMatch {
                house_number: Some("123".to_string()),
                road: Some("Main Street".to_string()),
                city: Some("Oakland".to_string()),
                state: Some("California".to_string()),
                postcode: Some("94601".to_string()),
            }),
        }
    }
}

#[async_trait]
impl AddressLookup for MockLookup {
    async fn lookup(&self, _query: &str) -> LookupStatus {
        self.status.clone()
    }
}

struct MockMailer {
    ok: bool,
    sent: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockMailer {
    fn new(ok: bool) -> Self {
        Self {
            ok,
            sent: Arc::new(Mutex::new(vec![])),
        }
    }
}

#[async_trait]
impl MailTransport for MockMailer {
    async fn send(&self, to: &str, subject: &str, _html_body: &str) -> anyhow::Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string()));
        if self.ok {
            Ok(())
        } else {
            anyhow::bail!("mail provider returned 500")
        }
    }
}

// ── Helpers ──

fn test_config(log_path: &str) -> AppConfig {
    AppConfig {
        port: 3000,
        record_log_path: log_path.to_string(),
        geocoder_url: "http://localhost:0".to_string(),
        geocoder_timeout_secs: 1,
        sendgrid_api_key: "test-key".to_string(),
        mail_from: "scheduling@clinic.example".to_string(),
        notification_recipients: vec![
            "staff@clinic.example".to_string(),
            "records@clinic.example".to_string(),
        ],
    }
}

struct TestHarness {
    state: Arc<AppState>,
    sent: Arc<Mutex<Vec<(String, String)>>>,
    _dir: tempfile::TempDir,
}

fn test_state(mail_ok: bool) -> TestHarness {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("records.json");
    let log = Arc::new(RecordLog::new(&log_path));

    let mailer = MockMailer::new(mail_ok);
    let sent = Arc::clone(&mailer.sent);

    let state = Arc::new(AppState {
        sessions: Mutex::new(HashMap::new()),
        config: test_config(log_path.to_str().unwrap()),
        lookup: Arc::new(MockLookup::matching()),
        mailer: Arc::new(mailer),
        log,
    });

    TestHarness {
        state,
        sent,
        _dir: dir,
    }
}

fn test_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/api/session", post(handlers::session::create_session))
        .route(
            "/api/session/:id/intake/field",
            post(handlers::intake::stage_field),
        )
        .route(
            "/api/session/:id/intake/date-of-birth",
            post(handlers::intake::validate_date_of_birth),
        )
        .route(
            "/api/session/:id/intake/address",
            post(handlers::intake::validate_address),
        )
        .route(
            "/api/session/:id/intake/phone",
            post(handlers::intake::validate_phone),
        )
        .route(
            "/api/session/:id/intake/completion",
            post(handlers::intake::check_completion),
        )
        .route(
            "/api/session/:id/appointments",
            get(handlers::scheduling::available_appointments),
        )
        .route("/api/session/:id/book", post(handlers::scheduling::book))
        .with_state(state)
}

async fn send(
    state: &Arc<AppState>,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let res = test_app(state.clone())
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_session(state: &Arc<AppState>) -> Uuid {
    let (status, json) = send(state, "POST", "/api/session", None).await;
    assert_eq!(status, StatusCode::OK);
    json["session_id"].as_str().unwrap().parse().unwrap()
}

async fn stage(state: &Arc<AppState>, id: Uuid, name: &str, value: &str) -> serde_json::Value {
    let (status, json) = send(
        state,
        "POST",
        &format!("/api/session/{id}/intake/field"),
        Some(serde_json::json!({ "field_name": name, "field_value": value })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json
}

// ── Health ──

#[tokio::test]
async fn test_health() {
    let harness = test_state(true);
    let (status, json) = send(&harness.state, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

// ── Session Lifecycle ──

#[tokio::test]
async fn test_create_session() {
    let harness = test_state(true);
    let (status, json) = send(&harness.state, "POST", "/api/session", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["session_id"].as_str().unwrap().parse::<Uuid>().is_ok());
}

#[tokio::test]
async fn test_unknown_session_is_404() {
    let harness = test_state(true);
    let id = Uuid::new_v4();
    let (status, json) = send(
        &harness.state,
        "POST",
        &format!("/api/session/{id}/intake/field"),
        Some(serde_json::json!({ "field_name": "name", "field_value": "Alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("unknown session"));
}

// ── Intake Flow ──

#[tokio::test]
async fn test_completion_reports_missing_fields() {
    let harness = test_state(true);
    let id = create_session(&harness.state).await;

    stage(&harness.state, id, "name", "Alice Example").await;
    stage(&harness.state, id, "insurance_payer", "Blue Cross").await;

    let (status, json) = send(
        &harness.state,
        "POST",
        &format!("/api/session/{id}/intake/completion"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["complete"], false);
    let missing: Vec<&str> = json["missing_fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(
        missing,
        vec![
            "date_of_birth",
            "chief_complaint",
            "insurance_id",
            "has_referral",
            "address",
            "phone",
        ]
    );
    assert!(json["record"].is_null());
}

#[tokio::test]
async fn test_dob_validation_rejects_impossible_date() {
    let harness = test_state(true);
    let id = create_session(&harness.state).await;

    let (status, json) = send(
        &harness.state,
        "POST",
        &format!("/api/session/{id}/intake/date-of-birth"),
        Some(serde_json::json!({ "month": 13, "day": 1, "year": 2000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["valid"], false);
}

#[tokio::test]
async fn test_phone_validation_corrective_message() {
    let harness = test_state(true);
    let id = create_session(&harness.state).await;

    let (status, json) = send(
        &harness.state,
        "POST",
        &format!("/api/session/{id}/intake/phone"),
        Some(serde_json::json!({ "phone_number": "123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["valid"], false);
    assert!(json["message"].as_str().unwrap().contains("10-digit"));
}

#[tokio::test]
async fn test_address_rejection_leaves_field_missing() {
    let harness = test_state(true);
    let id = create_session(&harness.state).await;

    let (status, json) = send(
        &harness.state,
        "POST",
        &format!("/api/session/{id}/intake/address"),
        Some(serde_json::json!({
            "street": "123 main st",
            "city": "oakland",
            "state": "ca",
            "zip_code": "94601",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["found"], true);
    assert_eq!(
        json["suggested_address"],
        "123 Main Street, Oakland, CA 94601"
    );

    // Caller says the candidate is wrong.
    let result = stage(&harness.state, id, "address", "no").await;
    assert_eq!(result["stored"], false);

    let (_, completion) = send(
        &harness.state,
        "POST",
        &format!("/api/session/{id}/intake/completion"),
        None,
    )
    .await;
    let missing: Vec<&str> = completion["missing_fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(missing.contains(&"address"));
}

// ── Full Flow ──

async fn run_full_intake(state: &Arc<AppState>, id: Uuid) {
    stage(state, id, "name", "Alice Example").await;
    stage(state, id, "chief_complaint", "persistent cough").await;
    stage(state, id, "insurance_payer", "Blue Cross").await;
    stage(state, id, "insurance_id", "BC123456").await;
    stage(state, id, "has_referral", "yes").await;
    stage(state, id, "referring_physician", "Dr. House").await;

    let (_, dob) = send(
        state,
        "POST",
        &format!("/api/session/{id}/intake/date-of-birth"),
        Some(serde_json::json!({ "month": 6, "day": 15, "year": 1990 })),
    )
    .await;
    assert_eq!(dob["valid"], true);
    assert_eq!(dob["verbal_date"], "June 15th, 1990");

    let (_, address) = send(
        state,
        "POST",
        &format!("/api/session/{id}/intake/address"),
        Some(serde_json::json!({
            "street": "123 main st",
            "city": "oakland",
            "state": "ca",
            "zip_code": "94601",
        })),
    )
    .await;
    assert_eq!(address["found"], true);
    stage(state, id, "address", "yes").await;

    let (_, phone) = send(
        state,
        "POST",
        &format!("/api/session/{id}/intake/phone"),
        Some(serde_json::json!({ "phone_number": "555-123-4567" })),
    )
    .await;
    assert_eq!(phone["valid"], true);
}

#[tokio::test]
async fn test_full_intake_and_booking_flow() {
    let harness = test_state(true);
    let id = create_session(&harness.state).await;

    run_full_intake(&harness.state, id).await;

    // Completion finalizes the record and moves the session to scheduling.
    let (status, completion) = send(
        &harness.state,
        "POST",
        &format!("/api/session/{id}/intake/completion"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(completion["complete"], true);
    let record = &completion["record"];
    assert_eq!(record["name"], "Alice Example");
    assert_eq!(record["date_of_birth"], "06-15-1990");
    assert_eq!(record["address"], "123 Main Street, Oakland, CA 94601");
    assert_eq!(record["phone"], "(555) 123-4567");
    assert_eq!(record["has_referral"], true);
    assert_eq!(record["referring_physician"], "Dr. House");
    assert!(record["appointment_doctor"].is_null());

    // Availability serves the whole catalog.
    let (status, availability) = send(
        &harness.state,
        "GET",
        &format!("/api/session/{id}/appointments?preferred_time=morning"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let doctors = availability["available_appointments"].as_array().unwrap();
    assert_eq!(doctors.len(), 3);
    assert_eq!(doctors[0]["doctor"], "Dr. Sarah Smith");

    // Book a slot.
    let (status, booking) = send(
        &harness.state,
        "POST",
        &format!("/api/session/{id}/book"),
        Some(serde_json::json!({
            "doctor": "Dr. Sarah Smith",
            "appointment_time": "Tomorrow at 10:00 AM",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(booking["success"], true);
    assert!(booking["message"]
        .as_str()
        .unwrap()
        .contains("Confirmation sent"));
    assert_eq!(booking["record"]["appointment_doctor"], "Dr. Sarah Smith");
    assert_eq!(booking["notification"]["attempted"], 2);
    assert_eq!(booking["notification"]["succeeded"], 2);
    assert_eq!(booking["notification"]["delivered"], true);

    // Both recipients got a confirmation with the patient's name in the subject.
    let sent = harness.sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].1.contains("Alice Example"));

    // The log holds the finalize event and the booked event.
    let entries = harness.state.log.read_all().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries[0]["appointment_doctor"].is_null());
    assert_eq!(entries[1]["appointment_doctor"], "Dr. Sarah Smith");
    assert!(entries[1]["timestamp"].is_string());
}

#[tokio::test]
async fn test_booking_pending_when_mail_fails() {
    let harness = test_state(false);
    let id = create_session(&harness.state).await;

    run_full_intake(&harness.state, id).await;
    send(
        &harness.state,
        "POST",
        &format!("/api/session/{id}/intake/completion"),
        None,
    )
    .await;

    let (status, booking) = send(
        &harness.state,
        "POST",
        &format!("/api/session/{id}/book"),
        Some(serde_json::json!({
            "doctor": "Dr. Emily Chen",
            "appointment_time": "Friday at 4:30 PM",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // Booking still succeeds; only the message changes.
    assert_eq!(booking["success"], true);
    assert!(booking["message"]
        .as_str()
        .unwrap()
        .contains("Confirmation pending"));
    assert_eq!(booking["notification"]["succeeded"], 0);
    assert_eq!(booking["notification"]["delivered"], false);
}

// ── Phase Gating ──

#[tokio::test]
async fn test_appointments_require_completed_intake() {
    let harness = test_state(true);
    let id = create_session(&harness.state).await;

    let (status, json) = send(
        &harness.state,
        "GET",
        &format!("/api/session/{id}/appointments"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("not complete"));
}

#[tokio::test]
async fn test_staging_after_completion_is_rejected() {
    let harness = test_state(true);
    let id = create_session(&harness.state).await;

    run_full_intake(&harness.state, id).await;
    send(
        &harness.state,
        "POST",
        &format!("/api/session/{id}/intake/completion"),
        None,
    )
    .await;

    let (status, _) = send(
        &harness.state,
        "POST",
        &format!("/api/session/{id}/intake/field"),
        Some(serde_json::json!({ "field_name": "name", "field_value": "Bob" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_completion_check_after_transition_still_reports_complete() {
    let harness = test_state(true);
    let id = create_session(&harness.state).await;

    run_full_intake(&harness.state, id).await;
    send(
        &harness.state,
        "POST",
        &format!("/api/session/{id}/intake/completion"),
        None,
    )
    .await;

    let (status, json) = send(
        &harness.state,
        "POST",
        &format!("/api/session/{id}/intake/completion"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["complete"], true);
    assert_eq!(json["record"]["name"], "Alice Example");
}
