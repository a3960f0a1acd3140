//! Event entity model, DTOs and public projections.

use autoriza_core::types::{Date, DbId, Timestamp};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub schedule_text: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub public_link: String,
    pub owner_user_id: DbId,
    pub campus_id: DbId,
    pub created_at: Timestamp,
}

/// An event together with how many authorizations it has.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EventWithCount {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub event: Event,
    pub authorization_count: i64,
}

/// DTO for creating an event.
///
/// `campus_id` falls back to the creator's campus when omitted.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEvent {
    pub title: String,
    pub description: Option<String>,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub schedule_text: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub campus_id: Option<DbId>,
}

/// DTO for updating an event. All fields are optional.
///
/// `end_date` uses `Option<Option<Date>>`: absent keeps the stored value,
/// an explicit `null` clears it and turns the event back into a single day.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<Date>,
    #[serde(default, deserialize_with = "present")]
    pub end_date: Option<Option<Date>>,
    pub schedule_text: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub campus_id: Option<DbId>,
}

/// Any value that is present in the payload, `null` included, becomes `Some`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// What anonymous visitors see in the public event listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PublicEventSummary {
    pub title: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub location: Option<String>,
    pub public_link: String,
}

/// What anonymous visitors see when opening an event's public link.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PublicEventDetail {
    pub title: String,
    pub description: Option<String>,
    pub start_date: Date,
    pub end_date: Option<Date>,
    pub schedule_text: Option<String>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub public_link: String,
}
