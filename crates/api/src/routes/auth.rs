//! Route definitions for the `/auth` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`. All of them are public.
///
/// ```text
/// POST /register      -> register
/// POST /request-code  -> request_code
/// POST /verify-code   -> verify_code_handler
/// POST /set-password  -> set_password
/// POST /login         -> login
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/request-code", post(auth::request_code))
        .route("/verify-code", post(auth::verify_code_handler))
        .route("/set-password", post(auth::set_password))
        .route("/login", post(auth::login))
}
