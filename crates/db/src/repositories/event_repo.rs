//! Repository for the `events` table.

use autoriza_core::types::DbId;
use sqlx::PgPool;

use crate::models::event::{
    CreateEvent, Event, EventWithCount, PublicEventDetail, PublicEventSummary, UpdateEvent,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, start_date, end_date, schedule_text, location, \
                       notes, public_link, owner_user_id, campus_id, created_at";

/// Same columns qualified with the `e` alias for joined queries.
const PREFIXED_COLUMNS: &str = "e.id, e.title, e.description, e.start_date, e.end_date, \
                                e.schedule_text, e.location, e.notes, e.public_link, \
                                e.owner_user_id, e.campus_id, e.created_at";

/// Provides CRUD operations for events.
pub struct EventRepo;

impl EventRepo {
    /// Insert a new event owned by `owner_user_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_user_id: DbId,
        campus_id: DbId,
        public_link: &str,
        input: &CreateEvent,
    ) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events (title, description, start_date, end_date, schedule_text,
                                 location, notes, public_link, owner_user_id, campus_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(input.title.trim())
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.schedule_text)
            .bind(&input.location)
            .bind(&input.notes)
            .bind(public_link)
            .bind(owner_user_id)
            .bind(campus_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_public_link(
        pool: &PgPool,
        public_link: &str,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE public_link = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(public_link)
            .fetch_optional(pool)
            .await
    }

    /// List events with their authorization counts, newest start date first.
    ///
    /// `owner_user_id` and `campus_id` narrow the result when present.
    pub async fn list(
        pool: &PgPool,
        owner_user_id: Option<DbId>,
        campus_id: Option<DbId>,
    ) -> Result<Vec<EventWithCount>, sqlx::Error> {
        let query = format!(
            "SELECT {PREFIXED_COLUMNS},
                    (SELECT COUNT(*) FROM authorizations a WHERE a.event_id = e.id)
                        AS authorization_count
             FROM events e
             WHERE ($1::BIGINT IS NULL OR e.owner_user_id = $1)
               AND ($2::BIGINT IS NULL OR e.campus_id = $2)
             ORDER BY e.start_date DESC, e.id DESC"
        );
        sqlx::query_as::<_, EventWithCount>(&query)
            .bind(owner_user_id)
            .bind(campus_id)
            .fetch_all(pool)
            .await
    }

    /// Public listing of every event, newest start date first.
    pub async fn list_public(pool: &PgPool) -> Result<Vec<PublicEventSummary>, sqlx::Error> {
        sqlx::query_as::<_, PublicEventSummary>(
            "SELECT title, start_date, end_date, location, public_link
             FROM events
             ORDER BY start_date DESC, id DESC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_public_by_link(
        pool: &PgPool,
        public_link: &str,
    ) -> Result<Option<PublicEventDetail>, sqlx::Error> {
        sqlx::query_as::<_, PublicEventDetail>(
            "SELECT title, description, start_date, end_date, schedule_text, location, notes,
                    public_link
             FROM events
             WHERE public_link = $1",
        )
        .bind(public_link)
        .fetch_optional(pool)
        .await
    }

    /// Update an event. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateEvent,
    ) -> Result<Option<Event>, sqlx::Error> {
        let query = format!(
            "UPDATE events SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                start_date = COALESCE($4, start_date),
                end_date = CASE WHEN $5 THEN $6 ELSE end_date END,
                schedule_text = COALESCE($7, schedule_text),
                location = COALESCE($8, location),
                notes = COALESCE($9, notes),
                campus_id = COALESCE($10, campus_id)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .bind(input.title.as_deref().map(str::trim))
            .bind(&input.description)
            .bind(input.start_date)
            .bind(input.end_date.is_some())
            .bind(input.end_date.flatten())
            .bind(&input.schedule_text)
            .bind(&input.location)
            .bind(&input.notes)
            .bind(input.campus_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an event and, through the cascade, its authorizations and
    /// attendance records.
    ///
    /// Returns the stored file references of the deleted authorizations so
    /// the caller can remove the files, or `None` if the event did not exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Vec<String>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let references = sqlx::query_scalar::<_, String>(
            "SELECT stored_file_reference FROM authorizations
             WHERE event_id = $1 AND stored_file_reference IS NOT NULL",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(references))
    }
}
