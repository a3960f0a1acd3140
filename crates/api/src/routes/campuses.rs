use axum::routing::{get, put};
use axum::Router;

use crate::handlers::campuses;
use crate::state::AppState;

/// Routes mounted at `/campuses`.
///
/// ```text
/// GET    /       -> list (public)
/// POST   /       -> create (admin)
/// PUT    /{id}   -> update (admin)
/// DELETE /{id}   -> delete (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(campuses::list).post(campuses::create))
        .route("/{id}", put(campuses::update).delete(campuses::delete))
}
