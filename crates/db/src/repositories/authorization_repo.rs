//! Repository for the `authorizations` table.
//!
//! Status changes are conditional on the current status in SQL, so two
//! concurrent requests cannot both move the same record.

use autoriza_core::authorization::{AuthorizationStatus, STATUS_PRE_REGISTERED, STATUS_SUBMITTED};
use autoriza_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::authorization::{
    Authorization, CreatePreRegistration, PreRegisteredStudent, SubmissionDetails,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, student_name, student_id_number, student_email, guardian_name, \
                       guardian_email, stored_file_reference, original_filename, file_size, \
                       file_mime_type, status, event_id, submitted_at";

/// Provides CRUD operations and status transitions for authorizations.
pub struct AuthorizationRepo;

impl AuthorizationRepo {
    /// Insert a `pre-registered` record for a student of `event_id`.
    pub async fn create_pre_registered(
        pool: &PgPool,
        event_id: DbId,
        input: &CreatePreRegistration,
    ) -> Result<Authorization, sqlx::Error> {
        let query = format!(
            "INSERT INTO authorizations (student_name, student_id_number, status, event_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Authorization>(&query)
            .bind(&input.student_name)
            .bind(&input.student_id_number)
            .bind(STATUS_PRE_REGISTERED)
            .bind(event_id)
            .fetch_one(pool)
            .await
    }

    /// Insert a record that goes straight to `submitted` (self-registration
    /// through the public link).
    pub async fn create_submitted(
        pool: &PgPool,
        event_id: DbId,
        student_name: &str,
        student_id_number: Option<&str>,
        details: &SubmissionDetails,
    ) -> Result<Authorization, sqlx::Error> {
        let query = format!(
            "INSERT INTO authorizations
                (student_name, student_id_number, student_email, guardian_name, guardian_email,
                 stored_file_reference, original_filename, file_size, file_mime_type,
                 status, event_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Authorization>(&query)
            .bind(student_name)
            .bind(student_id_number)
            .bind(&details.student_email)
            .bind(&details.guardian_name)
            .bind(&details.guardian_email)
            .bind(&details.stored_file_reference)
            .bind(&details.original_filename)
            .bind(details.file_size)
            .bind(&details.file_mime_type)
            .bind(STATUS_SUBMITTED)
            .bind(event_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Authorization>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM authorizations WHERE id = $1");
        sqlx::query_as::<_, Authorization>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All authorizations of an event ordered by student name.
    pub async fn list_for_event(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<Authorization>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM authorizations
             WHERE event_id = $1
             ORDER BY student_name, id"
        );
        sqlx::query_as::<_, Authorization>(&query)
            .bind(event_id)
            .fetch_all(pool)
            .await
    }

    /// Students of an event still waiting to submit, ordered by name.
    pub async fn list_pre_registered(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<PreRegisteredStudent>, sqlx::Error> {
        sqlx::query_as::<_, PreRegisteredStudent>(
            "SELECT id, student_name FROM authorizations
             WHERE event_id = $1 AND status = $2
             ORDER BY student_name, id",
        )
        .bind(event_id)
        .bind(STATUS_PRE_REGISTERED)
        .fetch_all(pool)
        .await
    }

    /// Attach submission details and move a `pre-registered` record to
    /// `submitted`.
    ///
    /// Returns `None` if the record does not exist or is no longer
    /// `pre-registered`.
    pub async fn submit(
        pool: &PgPool,
        id: DbId,
        details: &SubmissionDetails,
    ) -> Result<Option<Authorization>, sqlx::Error> {
        let query = format!(
            "UPDATE authorizations SET
                student_email = $2,
                guardian_name = $3,
                guardian_email = $4,
                stored_file_reference = $5,
                original_filename = $6,
                file_size = $7,
                file_mime_type = $8,
                status = $9,
                submitted_at = NOW()
             WHERE id = $1 AND status = $10
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Authorization>(&query)
            .bind(id)
            .bind(&details.student_email)
            .bind(&details.guardian_name)
            .bind(&details.guardian_email)
            .bind(&details.stored_file_reference)
            .bind(&details.original_filename)
            .bind(details.file_size)
            .bind(&details.file_mime_type)
            .bind(STATUS_SUBMITTED)
            .bind(STATUS_PRE_REGISTERED)
            .fetch_optional(pool)
            .await
    }

    /// Move a `submitted` record to `target`.
    ///
    /// Returns `None` if the record does not exist or is not `submitted`
    /// anymore (e.g. a concurrent reviewer got there first).
    pub async fn review(
        pool: &PgPool,
        id: DbId,
        target: AuthorizationStatus,
    ) -> Result<Option<Authorization>, sqlx::Error> {
        let query = format!(
            "UPDATE authorizations SET status = $2
             WHERE id = $1 AND status = $3
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Authorization>(&query)
            .bind(id)
            .bind(target.as_str())
            .bind(STATUS_SUBMITTED)
            .fetch_optional(pool)
            .await
    }

    /// Delete every authorization whose `submitted_at` is before `cutoff`.
    ///
    /// Returns `(id, stored_file_reference)` for each deleted row. Rows that
    /// never received a document carry `None`.
    pub async fn delete_older_than(
        pool: &PgPool,
        cutoff: Timestamp,
    ) -> Result<Vec<(DbId, Option<String>)>, sqlx::Error> {
        sqlx::query_as::<_, (DbId, Option<String>)>(
            "DELETE FROM authorizations WHERE submitted_at < $1
             RETURNING id, stored_file_reference",
        )
        .bind(cutoff)
        .fetch_all(pool)
        .await
    }

    /// Every stored file reference currently held by some authorization.
    pub async fn all_file_references(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT stored_file_reference FROM authorizations
             WHERE stored_file_reference IS NOT NULL",
        )
        .fetch_all(pool)
        .await
    }
}
