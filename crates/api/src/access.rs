//! Ownership checks for events and authorizations.
//!
//! Every authenticated handler that touches an event or an authorization
//! goes through one of these loaders before reading or writing anything.
//! A missing row is reported as 404 before any 403.

use autoriza_core::access::ensure_event_access;
use autoriza_core::error::CoreError;
use autoriza_core::types::DbId;
use autoriza_db::models::authorization::Authorization;
use autoriza_db::models::event::Event;
use autoriza_db::repositories::{AuthorizationRepo, EventRepo};
use sqlx::PgPool;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;

/// Load an event the caller owns (or any event, for admins).
pub async fn load_event_for_user(
    pool: &PgPool,
    event_id: DbId,
    user: &AuthUser,
) -> AppResult<Event> {
    let event = EventRepo::find_by_id(pool, event_id)
        .await?
        .ok_or(CoreError::not_found("Event", event_id))?;

    if let Err(e) = ensure_event_access(&user.principal(), event.owner_user_id) {
        tracing::warn!(user_id = user.user_id, event_id, "Event access denied");
        return Err(e.into());
    }
    Ok(event)
}

/// Load an authorization through its parent event's ownership.
///
/// Returns the parent event too, since callers almost always need it.
pub async fn load_authorization_for_user(
    pool: &PgPool,
    authorization_id: DbId,
    user: &AuthUser,
) -> AppResult<(Authorization, Event)> {
    let authorization = AuthorizationRepo::find_by_id(pool, authorization_id)
        .await?
        .ok_or(CoreError::not_found("Authorization", authorization_id))?;

    let event = EventRepo::find_by_id(pool, authorization.event_id)
        .await?
        .ok_or(CoreError::not_found("Event", authorization.event_id))?;

    if let Err(e) = ensure_event_access(&user.principal(), event.owner_user_id) {
        tracing::warn!(
            user_id = user.user_id,
            authorization_id,
            event_id = event.id,
            "Authorization access denied"
        );
        return Err(e.into());
    }
    Ok((authorization, event))
}
