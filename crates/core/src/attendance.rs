//! Attendance marking rules.
//!
//! Attendance is tracked per authorization and per event day, with one flag
//! for the outbound leg and one for the return leg. A return can never be
//! credited without the matching outbound.

use serde::{Deserialize, Serialize};

use crate::authorization::AuthorizationStatus;
use crate::error::CoreError;
use crate::types::Date;

/// The inclusive `[start, end]` day range of an event.
///
/// Single-day events have no end date; the window is then just `start`.
pub fn event_window(start_date: Date, end_date: Option<Date>) -> (Date, Date) {
    (start_date, end_date.unwrap_or(start_date))
}

/// Fail unless `date` falls inside the event's day range.
pub fn ensure_date_in_window(
    date: Date,
    start_date: Date,
    end_date: Option<Date>,
) -> Result<(), CoreError> {
    let (first, last) = event_window(start_date, end_date);
    if date < first || date > last {
        return Err(CoreError::Validation(format!(
            "Attendance date {date} is outside the event period ({first} to {last})"
        )));
    }
    Ok(())
}

/// Attendance can only be taken for approved authorizations.
pub fn ensure_attendance_allowed(status: AuthorizationStatus) -> Result<(), CoreError> {
    if status != AuthorizationStatus::Approved {
        return Err(CoreError::Validation(format!(
            "Attendance can only be marked for approved authorizations (current status: {status})"
        )));
    }
    Ok(())
}

/// Requested change to one attendance day. Absent fields are left untouched.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct AttendanceUpdate {
    pub present_outbound: Option<bool>,
    pub present_return: Option<bool>,
}

/// The two presence flags of one attendance day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceMarks {
    pub present_outbound: bool,
    pub present_return: bool,
}

impl AttendanceMarks {
    /// Apply `update` on top of the current marks.
    ///
    /// Setting `present_return = true` requires the outbound leg to be present
    /// after the update. Clearing the outbound leg without mentioning the
    /// return leg clears the return leg as well.
    pub fn apply(self, update: AttendanceUpdate) -> Result<AttendanceMarks, CoreError> {
        let present_outbound = update.present_outbound.unwrap_or(self.present_outbound);

        let present_return = match update.present_return {
            Some(true) if !present_outbound => {
                return Err(CoreError::Validation(
                    "Return presence requires outbound presence on the same day".into(),
                ));
            }
            Some(value) => value,
            None => self.present_return && present_outbound,
        };

        Ok(AttendanceMarks {
            present_outbound,
            present_return,
        })
    }

    pub fn is_consistent(self) -> bool {
        !self.present_return || self.present_outbound
    }
}
