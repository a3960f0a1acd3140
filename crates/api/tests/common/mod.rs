#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tempfile::TempDir;
use tokio::sync::broadcast;
use tower::ServiceExt;

use autoriza_api::auth::jwt::{generate_access_token, JwtConfig};
use autoriza_api::auth::password::hash_password;
use autoriza_api::config::{MaintenanceConfig, ServerConfig, UploadConfig};
use autoriza_api::router::build_app_router;
use autoriza_api::state::AppState;
use autoriza_api::storage::FileStore;
use autoriza_core::roles::Role;
use autoriza_core::types::DbId;
use autoriza_db::models::campus::CreateCampus;
use autoriza_db::models::user::{CreateUser, User};
use autoriza_db::repositories::{CampusRepo, UserRepo};
use autoriza_events::{Notification, NotificationBus};

pub const TEST_PASSWORD: &str = "test_password_123!";

/// Small enough that size-limit tests stay cheap.
pub const TEST_MAX_FILE_SIZE: usize = 64 * 1024;

/// A minimal PDF body; only the declared content type is checked.
pub const PDF_BYTES: &[u8] = b"%PDF-1.4\n1 0 obj <<>> endobj\ntrailer <<>>\n%%EOF\n";

/// Build a test `ServerConfig` with safe defaults and uploads under `upload_dir`.
pub fn test_config(upload_dir: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret".to_string(),
            access_token_expiry_mins: 60,
        },
        upload: UploadConfig {
            directory: upload_dir.to_path_buf(),
            max_file_size: TEST_MAX_FILE_SIZE,
        },
        maintenance: MaintenanceConfig::default(),
    }
}

/// The application under test plus everything a test may want to inspect.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    /// Receives every notification the handlers publish.
    pub notifications: broadcast::Receiver<Notification>,
    /// Upload directory; removed when the test ends.
    pub uploads: TempDir,
}

impl TestApp {
    /// A fresh handle to the router; `oneshot` consumes it.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn jwt(&self) -> &JwtConfig {
        &self.state.config.jwt
    }

    /// Everything published so far, without waiting.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Ok(n) = self.notifications.try_recv() {
            out.push(n);
        }
        out
    }

    /// Number of files currently in the upload directory.
    pub fn stored_file_count(&self) -> usize {
        std::fs::read_dir(self.uploads.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

/// Build the full application router the same way `main.rs` does, using
/// the given database pool and a temporary upload directory.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let uploads = tempfile::tempdir().expect("tempdir should be created");
    let config = test_config(uploads.path());

    let notifications = Arc::new(NotificationBus::default());
    let receiver = notifications.subscribe();

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        file_store: Arc::new(FileStore::new(
            uploads.path(),
            config.upload.max_file_size,
        )),
        notifications,
    };

    TestApp {
        router: build_app_router(state.clone(), &config),
        state,
        notifications: receiver,
        uploads,
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn create_campus(pool: &PgPool, name: &str) -> DbId {
    CampusRepo::create(pool, &CreateCampus { name: name.to_string() })
        .await
        .expect("campus creation should succeed")
        .id
}

/// Insert an active user with [`TEST_PASSWORD`].
pub async fn create_user(
    pool: &PgPool,
    email: &str,
    role: Role,
    campus_id: Option<DbId>,
) -> User {
    let hashed = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            password_hash: Some(hashed),
            role,
            is_active: true,
            campus_id,
            verification_code: None,
            verification_code_expires_at: None,
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Insert an active user and mint a token for them.
pub async fn user_with_token(
    app: &TestApp,
    email: &str,
    role: Role,
    campus_id: Option<DbId>,
) -> (User, String) {
    let user = create_user(&app.state.pool, email, role, campus_id).await;
    let token = generate_access_token(user.id, &user.email, user.role, app.jwt())
        .expect("token generation should succeed");
    (user, token)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

fn request(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(token) => builder.header("authorization", format!("Bearer {token}")),
        None => builder,
    }
}

fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    request(method, uri, token)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, request(Method::GET, uri, None).body(Body::empty()).unwrap()).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        request(Method::GET, uri, Some(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(
        app,
        request(Method::DELETE, uri, Some(token))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, json_request(Method::PUT, uri, Some(token), body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, json_request(Method::PATCH, uri, Some(token), body)).await
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "----autoriza-test-boundary";

/// A `multipart/form-data` body built by hand.
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, filename: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
                 filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    /// Contact fields that pass validation.
    pub fn valid_contact(self) -> Self {
        self.text("student_email", "ana@example.com")
            .text("guardian_name", "Maria Silva")
            .text("guardian_email", "maria@example.com")
    }

    fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

pub async fn send_multipart(
    app: Router,
    method: Method,
    uri: &str,
    form: MultipartForm,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(form.finish()))
        .expect("request should build");
    send(app, request).await
}
