//! User entity model and DTOs.

use autoriza_core::roles::Role;
use autoriza_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Full user row from the `users` table.
///
/// Contains the password hash and the pending verification code -- NEVER
/// serialize this to API responses directly. Use [`UserResponse`] instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub name: String,
    pub email: String,
    /// `None` until the account sets its first password.
    pub password_hash: Option<String>,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub is_active: bool,
    pub verification_code: Option<String>,
    pub verification_code_expires_at: Option<Timestamp>,
    pub campus_id: Option<DbId>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// Safe user representation for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_active: bool,
    pub campus_id: Option<DbId>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            is_active: user.is_active,
            campus_id: user.campus_id,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

/// Input for inserting a user. Built by the handlers, never deserialized
/// straight from a request because it carries the password hash.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub role: Role,
    pub is_active: bool,
    pub campus_id: Option<DbId>,
    pub verification_code: Option<String>,
    pub verification_code_expires_at: Option<Timestamp>,
}
