//! HTTP-level integration tests for the authorization lifecycle:
//! submission, review, attendance and document download.

mod common;

use assert_matches::assert_matches;
use autoriza_core::roles::Role;
use autoriza_events::Notification;
use axum::http::{Method, StatusCode};
use common::{
    body_bytes, body_json, delete_auth, get_auth, patch_json_auth, post_json_auth,
    send_multipart, user_with_token, MultipartForm, TestApp, PDF_BYTES, TEST_MAX_FILE_SIZE,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// An event owned by a professor, with one pre-registered student.
struct Fixture {
    app: TestApp,
    owner_token: String,
    event_id: i64,
    public_link: String,
    authorization_id: i64,
}

async fn fixture(pool: PgPool) -> Fixture {
    let mut app = common::build_test_app(pool.clone());
    let campus = common::create_campus(&pool, "Centro").await;
    let (_, owner_token) =
        user_with_token(&app, "owner@example.com", Role::Professor, Some(campus)).await;

    let response = post_json_auth(
        app.router(),
        "/api/v1/events",
        &owner_token,
        serde_json::json!({
            "title": "Museum visit",
            "start_date": "2025-05-10",
            "end_date": "2025-05-12",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let event = body_json(response).await["data"].clone();
    let event_id = event["id"].as_i64().unwrap();

    let response = post_json_auth(
        app.router(),
        &format!("/api/v1/events/{event_id}/authorizations"),
        &owner_token,
        serde_json::json!({ "student_name": "Ana Souza" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let authorization_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    app.drain_notifications();
    Fixture {
        app,
        owner_token,
        event_id,
        public_link: event["public_link"].as_str().unwrap().to_string(),
        authorization_id,
    }
}

async fn submit(f: &Fixture, form: MultipartForm) -> axum::http::Response<axum::body::Body> {
    send_multipart(
        f.app.router(),
        Method::PUT,
        &format!("/api/v1/authorizations/{}/submit", f.authorization_id),
        form,
    )
    .await
}

async fn submit_valid(f: &Fixture) {
    let form = MultipartForm::new()
        .valid_contact()
        .file("autorizacao.pdf", "application/pdf", PDF_BYTES);
    assert_eq!(submit(f, form).await.status(), StatusCode::OK);
}

async fn review(f: &Fixture, token: &str, status: &str) -> StatusCode {
    review_by_id(f, f.authorization_id, token, status).await
}

async fn review_by_id(f: &Fixture, id: i64, token: &str, status: &str) -> StatusCode {
    patch_json_auth(
        f.app.router(),
        &format!("/api/v1/authorizations/{id}/status"),
        token,
        serde_json::json!({ "status": status }),
    )
    .await
    .status()
}

async fn current_status(f: &Fixture) -> String {
    let response = get_auth(
        f.app.router(),
        &format!("/api/v1/authorizations/{}", f.authorization_id),
        &f.owner_token,
    )
    .await;
    body_json(response).await["data"]["status"]
        .as_str()
        .unwrap()
        .to_string()
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn submission_with_same_student_and_guardian_email_fails(pool: PgPool) {
    let mut f = fixture(pool).await;

    let form = MultipartForm::new()
        .text("student_email", "ana@example.com")
        .text("guardian_name", "Maria Silva")
        .text("guardian_email", "ANA@example.com")
        .file("autorizacao.pdf", "application/pdf", PDF_BYTES);
    assert_eq!(submit(&f, form).await.status(), StatusCode::BAD_REQUEST);

    assert_eq!(current_status(&f).await, "pre-registered");
    assert_eq!(f.app.stored_file_count(), 0);
    assert!(f.app.drain_notifications().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn valid_submission_stores_file_and_notifies(pool: PgPool) {
    let mut f = fixture(pool).await;

    let form = MultipartForm::new()
        .valid_contact()
        .file("autorizacao.pdf", "application/pdf", PDF_BYTES);
    let response = submit(&f, form).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "submitted");
    assert_eq!(json["data"]["original_filename"], "autorizacao.pdf");
    assert_eq!(json["data"]["file_size"], PDF_BYTES.len());
    assert!(json["data"].get("stored_file_reference").is_none());
    assert_eq!(f.app.stored_file_count(), 1);

    let notifications = f.app.drain_notifications();
    assert_eq!(notifications.len(), 2);
    assert_matches!(
        &notifications[0],
        Notification::SubmissionConfirmation { student, event_title } => {
            assert_eq!(student.guardian_email.as_deref(), Some("maria@example.com"));
            assert_eq!(event_title, "Museum visit");
        }
    );
    assert_matches!(
        &notifications[1],
        Notification::NewSubmission { owner_email, .. } => {
            assert_eq!(owner_email, "owner@example.com");
        }
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn submitting_twice_fails(pool: PgPool) {
    let f = fixture(pool).await;
    submit_valid(&f).await;

    let form = MultipartForm::new()
        .valid_contact()
        .file("again.pdf", "application/pdf", PDF_BYTES);
    assert_eq!(submit(&f, form).await.status(), StatusCode::BAD_REQUEST);
    assert_eq!(f.app.stored_file_count(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn submission_rejects_bad_files(pool: PgPool) {
    let f = fixture(pool).await;

    let form = MultipartForm::new()
        .valid_contact()
        .file("notes.txt", "text/plain", b"hello");
    assert_eq!(submit(&f, form).await.status(), StatusCode::BAD_REQUEST);

    let too_big = vec![b'x'; TEST_MAX_FILE_SIZE + 1];
    let form = MultipartForm::new()
        .valid_contact()
        .file("big.pdf", "application/pdf", &too_big);
    assert_eq!(submit(&f, form).await.status(), StatusCode::BAD_REQUEST);

    let form = MultipartForm::new().valid_contact();
    assert_eq!(submit(&f, form).await.status(), StatusCode::BAD_REQUEST);

    assert_eq!(f.app.stored_file_count(), 0);
    assert_eq!(current_status(&f).await, "pre-registered");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn self_registration_goes_straight_to_submitted(pool: PgPool) {
    let mut f = fixture(pool).await;

    let form = MultipartForm::new()
        .text("student_name", "Bruno Lima")
        .valid_contact()
        .file("foto.png", "image/png", b"\x89PNG fake");
    let response = send_multipart(
        f.app.router(),
        Method::POST,
        &format!("/api/v1/public/events/{}/authorizations", f.public_link),
        form,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "submitted");
    assert_eq!(json["data"]["event_id"], f.event_id);
    assert_eq!(f.app.drain_notifications().len(), 2);

    let response = get_auth(
        f.app.router(),
        &format!("/api/v1/events/{}/authorizations", f.event_id),
        &f.owner_token,
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

// ---------------------------------------------------------------------------
// Review
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn other_professor_cannot_review(pool: PgPool) {
    let f = fixture(pool).await;
    submit_valid(&f).await;
    let (_, intruder) =
        user_with_token(&f.app, "intruder@example.com", Role::Professor, None).await;

    assert_eq!(review(&f, &intruder, "approved").await, StatusCode::FORBIDDEN);
    assert_eq!(current_status(&f).await, "submitted");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn review_requires_submitted_status(pool: PgPool) {
    let f = fixture(pool).await;

    assert_eq!(
        review(&f, &f.owner_token, "approved").await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(current_status(&f).await, "pre-registered");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_review_status_is_rejected(pool: PgPool) {
    let f = fixture(pool).await;
    submit_valid(&f).await;

    assert_eq!(
        review(&f, &f.owner_token, "pre-registered").await,
        StatusCode::BAD_REQUEST
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rejection_is_final_and_notifies_with_reason(pool: PgPool) {
    let mut f = fixture(pool).await;
    submit_valid(&f).await;
    f.app.drain_notifications();

    let response = patch_json_auth(
        f.app.router(),
        &format!("/api/v1/authorizations/{}/status", f.authorization_id),
        &f.owner_token,
        serde_json::json!({ "status": "rejected", "reason": "Missing signature" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let notifications = f.app.drain_notifications();
    assert_matches!(
        notifications.as_slice(),
        [Notification::AuthorizationRejected { reason: Some(reason), .. }] => {
            assert_eq!(reason, "Missing signature");
        }
    );

    assert_eq!(
        review(&f, &f.owner_token, "approved").await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(current_status(&f).await, "rejected");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_can_approve_any_authorization(pool: PgPool) {
    let mut f = fixture(pool).await;
    submit_valid(&f).await;
    f.app.drain_notifications();
    let (_, admin) = user_with_token(&f.app, "admin@example.com", Role::Admin, None).await;

    assert_eq!(review(&f, &admin, "approved").await, StatusCode::OK);
    assert_eq!(current_status(&f).await, "approved");
    assert_matches!(
        f.app.drain_notifications().as_slice(),
        [Notification::AuthorizationApproved { .. }]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn access_checks_run_before_status_parsing(pool: PgPool) {
    let f = fixture(pool).await;
    submit_valid(&f).await;
    let (_, intruder) =
        user_with_token(&f.app, "intruder@example.com", Role::Professor, None).await;

    assert_eq!(
        review_by_id(&f, 999_999, &f.owner_token, "bogus").await,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        review_by_id(&f, f.authorization_id, &intruder, "bogus").await,
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        review(&f, &f.owner_token, "bogus").await,
        StatusCode::BAD_REQUEST
    );
    assert_eq!(current_status(&f).await, "submitted");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_authorization_is_not_found_for_everyone(pool: PgPool) {
    let f = fixture(pool).await;
    let (_, intruder) =
        user_with_token(&f.app, "intruder@example.com", Role::Professor, None).await;
    let missing = 999_999;

    for token in [&f.owner_token, &intruder] {
        let response =
            get_auth(f.app.router(), &format!("/api/v1/authorizations/{missing}"), token).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        assert_eq!(
            review_by_id(&f, missing, token, "approved").await,
            StatusCode::NOT_FOUND
        );

        let response = patch_json_auth(
            f.app.router(),
            &format!("/api/v1/authorizations/{missing}/attendance/2025-05-10"),
            token,
            serde_json::json!({ "present_outbound": true }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

// ---------------------------------------------------------------------------
// Attendance
// ---------------------------------------------------------------------------

async fn mark(
    f: &Fixture,
    date: &str,
    body: serde_json::Value,
) -> axum::http::Response<axum::body::Body> {
    patch_json_auth(
        f.app.router(),
        &format!("/api/v1/authorizations/{}/attendance/{date}", f.authorization_id),
        &f.owner_token,
        body,
    )
    .await
}

async fn attendance(f: &Fixture) -> serde_json::Value {
    let response = get_auth(
        f.app.router(),
        &format!("/api/v1/authorizations/{}/attendance", f.authorization_id),
        &f.owner_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn attendance_requires_approval(pool: PgPool) {
    let f = fixture(pool).await;
    submit_valid(&f).await;

    let response = mark(&f, "2025-05-10", serde_json::json!({ "present_outbound": true })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(attendance(&f).await, serde_json::json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn attendance_outside_event_window_creates_nothing(pool: PgPool) {
    let f = fixture(pool).await;
    submit_valid(&f).await;
    assert_eq!(review(&f, &f.owner_token, "approved").await, StatusCode::OK);

    let response = mark(&f, "2025-05-09", serde_json::json!({ "present_outbound": true })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let response = mark(&f, "2025-05-13", serde_json::json!({ "present_outbound": true })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(attendance(&f).await, serde_json::json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn attendance_marks_follow_outbound_rule(pool: PgPool) {
    let f = fixture(pool).await;
    submit_valid(&f).await;
    assert_eq!(review(&f, &f.owner_token, "approved").await, StatusCode::OK);

    // Return without outbound is refused.
    let response = mark(&f, "2025-05-11", serde_json::json!({ "present_return": true })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = mark(
        &f,
        "2025-05-11",
        serde_json::json!({ "present_outbound": true, "present_return": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["present_return"], true);

    // Clearing outbound clears return too.
    let response = mark(&f, "2025-05-11", serde_json::json!({ "present_outbound": false })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["present_outbound"], false);
    assert_eq!(json["data"]["present_return"], false);

    let records = attendance(&f).await;
    assert_eq!(records.as_array().unwrap().len(), 1);
    assert_eq!(records[0]["attendance_date"], "2025-05-11");
}

// ---------------------------------------------------------------------------
// Download and deletion
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn owner_downloads_submitted_document(pool: PgPool) {
    let f = fixture(pool).await;

    let uri = format!("/api/v1/authorizations/{}/file", f.authorization_id);
    let response = get_auth(f.app.router(), &uri, &f.owner_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    submit_valid(&f).await;

    let response = get_auth(f.app.router(), &uri, &f.owner_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/pdf");
    assert_eq!(
        response.headers()["content-disposition"],
        "attachment; filename=\"autorizacao.pdf\""
    );
    assert_eq!(body_bytes(response).await, PDF_BYTES);

    let (_, intruder) =
        user_with_token(&f.app, "intruder@example.com", Role::Professor, None).await;
    let response = get_auth(f.app.router(), &uri, &intruder).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn download_of_vanished_document_is_not_found(pool: PgPool) {
    let f = fixture(pool).await;
    submit_valid(&f).await;
    for entry in std::fs::read_dir(f.app.uploads.path()).unwrap() {
        std::fs::remove_file(entry.unwrap().path()).unwrap();
    }

    let uri = format!("/api/v1/authorizations/{}/file", f.authorization_id);
    let response = get_auth(f.app.router(), &uri, &f.owner_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "File not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_event_removes_documents(pool: PgPool) {
    let f = fixture(pool).await;
    submit_valid(&f).await;
    assert_eq!(f.app.stored_file_count(), 1);

    let response = delete_auth(
        f.app.router(),
        &format!("/api/v1/events/{}", f.event_id),
        &f.owner_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(f.app.stored_file_count(), 0);

    let response = get_auth(
        f.app.router(),
        &format!("/api/v1/authorizations/{}", f.authorization_id),
        &f.owner_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
