//! Repository for the `users` table.

use autoriza_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, password_hash, role, is_active, verification_code, \
                       verification_code_expires_at, campus_id, last_login_at, created_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (name, email, password_hash, role, is_active, campus_id,
                                verification_code, verification_code_expires_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role.as_str())
            .bind(input.is_active)
            .bind(input.campus_id)
            .bind(&input.verification_code)
            .bind(input.verification_code_expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email. Emails are stored lower-cased.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List all users ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY name, id");
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Refresh a pending (inactive) registration with a new name, campus and
    /// verification code.
    ///
    /// Returns `None` if the user does not exist or is already active.
    pub async fn refresh_pending_registration(
        pool: &PgPool,
        id: DbId,
        name: &str,
        campus_id: Option<DbId>,
        code: &str,
        expires_at: Timestamp,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                name = $2,
                campus_id = COALESCE($3, campus_id),
                verification_code = $4,
                verification_code_expires_at = $5
             WHERE id = $1 AND is_active = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(name)
            .bind(campus_id)
            .bind(code)
            .bind(expires_at)
            .fetch_optional(pool)
            .await
    }

    /// Store a fresh verification code and its expiry.
    pub async fn set_verification_code(
        pool: &PgPool,
        id: DbId,
        code: &str,
        expires_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET verification_code = $2, verification_code_expires_at = $3
             WHERE id = $1",
        )
        .bind(id)
        .bind(code)
        .bind(expires_at)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store a new password hash, consume the verification code and activate
    /// the account.
    ///
    /// The update only applies while `code` is still stored and unexpired, so
    /// a code can be consumed once. Returns `true` if the row was updated.
    pub async fn set_password_and_activate(
        pool: &PgPool,
        id: DbId,
        code: &str,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET
                password_hash = $3,
                is_active = true,
                verification_code = NULL,
                verification_code_expires_at = NULL
             WHERE id = $1
               AND verification_code = $2
               AND verification_code_expires_at > NOW()",
        )
        .bind(id)
        .bind(code)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set `last_login_at` to now.
    pub async fn record_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
