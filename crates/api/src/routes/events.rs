//! Route definitions for the `/events` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::events;
use crate::state::AppState;

/// Routes mounted at `/events`. All require authentication; everything
/// below `/{id}` also requires ownership of the event (or admin).
///
/// ```text
/// GET    /                       -> list
/// POST   /                       -> create
/// GET    /{id}                   -> get
/// PUT    /{id}                   -> update
/// DELETE /{id}                   -> delete
/// GET    /{id}/authorizations    -> list_authorizations
/// POST   /{id}/authorizations    -> pre_register
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(events::list).post(events::create))
        .route(
            "/{id}",
            get(events::get).put(events::update).delete(events::delete),
        )
        .route(
            "/{id}/authorizations",
            get(events::list_authorizations).post(events::pre_register),
        )
}
