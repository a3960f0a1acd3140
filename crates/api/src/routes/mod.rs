pub mod auth;
pub mod authorizations;
pub mod campuses;
pub mod events;
pub mod health;
pub mod public;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                   start registration (public)
/// /auth/request-code                               issue a new code (public)
/// /auth/verify-code                                check a code (public)
/// /auth/set-password                               activate / reset (public)
/// /auth/login                                      login (public)
///
/// /users                                           list, create (admin only)
/// /users/me                                        own profile
///
/// /campuses                                        list (public), create (admin)
/// /campuses/{id}                                   update, delete (admin)
///
/// /events                                          list, create
/// /events/{id}                                     get, update, delete
/// /events/{id}/authorizations                      list, pre-register
///
/// /public/events                                   list (public)
/// /public/events/{link}                            detail (public)
/// /public/events/{link}/pre-registered             pending students (public)
/// /public/events/{link}/authorizations             self-registration (public, multipart)
///
/// /authorizations/{id}                             get
/// /authorizations/{id}/submit                      submit (public, multipart)
/// /authorizations/{id}/status                      approve / reject
/// /authorizations/{id}/file                        download document
/// /authorizations/{id}/attendance                  list
/// /authorizations/{id}/attendance/{date}           mark one day
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Registration, verification codes and login.
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/campuses", campuses::router())
        // Staff-facing event management.
        .nest("/events", events::router())
        // Student-facing pages reached through the public link.
        .nest("/public", public::router())
        .nest("/authorizations", authorizations::router())
}
