//! Campus entity model and DTOs.

use autoriza_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `campuses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Campus {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
}

/// DTO for creating a campus.
#[derive(Debug, Deserialize)]
pub struct CreateCampus {
    pub name: String,
}

/// DTO for renaming a campus.
#[derive(Debug, Deserialize)]
pub struct UpdateCampus {
    pub name: String,
}
