//! Route definitions for the unauthenticated `/public` pages.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// Routes mounted at `/public`.
///
/// ```text
/// GET  /events                                -> list_events
/// GET  /events/{link}                         -> get_event
/// GET  /events/{link}/pre-registered          -> list_pre_registered
/// POST /events/{link}/authorizations          -> self_register (multipart)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(public::list_events))
        .route("/events/{link}", get(public::get_event))
        .route(
            "/events/{link}/pre-registered",
            get(public::list_pre_registered),
        )
        .route(
            "/events/{link}/authorizations",
            post(public::self_register),
        )
}
