//! Route definitions for the `/authorizations` resource.

use axum::routing::{get, patch, put};
use axum::Router;

use crate::handlers::{attendance, authorizations};
use crate::state::AppState;

/// Routes mounted at `/authorizations`.
///
/// ```text
/// GET   /{id}                       -> get
/// PUT   /{id}/submit                -> submit (public, multipart)
/// PATCH /{id}/status                -> update_status
/// GET   /{id}/file                  -> download_file
/// GET   /{id}/attendance            -> attendance::list
/// PATCH /{id}/attendance/{date}     -> attendance::mark
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(authorizations::get))
        .route("/{id}/submit", put(authorizations::submit))
        .route("/{id}/status", patch(authorizations::update_status))
        .route("/{id}/file", get(authorizations::download_file))
        .route("/{id}/attendance", get(attendance::list))
        .route("/{id}/attendance/{date}", patch(attendance::mark))
}
