//! Attendance entity model.

use autoriza_core::attendance::AttendanceMarks;
use autoriza_core::types::{Date, DbId};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `attendance` table: one student, one day.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Attendance {
    pub id: DbId,
    pub authorization_id: DbId,
    pub attendance_date: Date,
    pub present_outbound: bool,
    pub present_return: bool,
}

impl Attendance {
    pub fn marks(&self) -> AttendanceMarks {
        AttendanceMarks {
            present_outbound: self.present_outbound,
            present_return: self.present_return,
        }
    }
}
