//! Repository for the `campuses` table.

use autoriza_core::types::DbId;
use sqlx::PgPool;

use crate::models::campus::{Campus, CreateCampus, UpdateCampus};

const COLUMNS: &str = "id, name, created_at";

/// Provides CRUD operations for campuses.
pub struct CampusRepo;

impl CampusRepo {
    /// Insert a new campus, returning the created row.
    ///
    /// A duplicate name violates `uq_campuses_name`.
    pub async fn create(pool: &PgPool, input: &CreateCampus) -> Result<Campus, sqlx::Error> {
        let query = format!("INSERT INTO campuses (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Campus>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Campus>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campuses WHERE id = $1");
        sqlx::query_as::<_, Campus>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List campuses ordered by name.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Campus>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM campuses ORDER BY name, id LIMIT $1 OFFSET $2");
        sqlx::query_as::<_, Campus>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Rename a campus. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCampus,
    ) -> Result<Option<Campus>, sqlx::Error> {
        let query = format!("UPDATE campuses SET name = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Campus>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
    }

    /// Whether any user or event still points at this campus.
    pub async fn is_referenced(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM users WHERE campus_id = $1)
                 OR EXISTS (SELECT 1 FROM events WHERE campus_id = $1)",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Delete a campus. Returns `true` if a row was removed.
    ///
    /// Fails with a foreign key violation while the campus is referenced.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM campuses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
