//! Authorization entity model and DTOs.

use autoriza_core::authorization::AuthorizationStatus;
use autoriza_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::attendance::Attendance;

/// A row from the `authorizations` table.
///
/// The stored file reference is an internal storage key and is never
/// serialized; clients download the file through its own endpoint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Authorization {
    pub id: DbId,
    pub student_name: String,
    pub student_id_number: Option<String>,
    pub student_email: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_email: Option<String>,
    #[serde(skip_serializing)]
    pub stored_file_reference: Option<String>,
    pub original_filename: Option<String>,
    pub file_size: Option<i64>,
    pub file_mime_type: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: AuthorizationStatus,
    pub event_id: DbId,
    pub submitted_at: Timestamp,
}

/// An authorization with its attendance days, as shown to event staff.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationWithAttendance {
    #[serde(flatten)]
    pub authorization: Authorization,
    pub attendance: Vec<Attendance>,
}

/// DTO for pre-registering a student.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePreRegistration {
    pub student_name: String,
    pub student_id_number: Option<String>,
}

/// Contact details and stored file attached when a student submits.
#[derive(Debug, Clone)]
pub struct SubmissionDetails {
    pub student_email: String,
    pub guardian_name: String,
    pub guardian_email: String,
    pub stored_file_reference: String,
    pub original_filename: String,
    pub file_size: i64,
    pub file_mime_type: String,
}

/// Pre-registered students listed on an event's public page.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PreRegisteredStudent {
    pub id: DbId,
    pub student_name: String,
}
