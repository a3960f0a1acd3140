//! Repository for the `attendance` table.

use autoriza_core::attendance::AttendanceMarks;
use autoriza_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::attendance::Attendance;

const COLUMNS: &str = "id, authorization_id, attendance_date, present_outbound, present_return";

/// Provides access to per-day attendance records.
pub struct AttendanceRepo;

impl AttendanceRepo {
    pub async fn find(
        pool: &PgPool,
        authorization_id: DbId,
        attendance_date: Date,
    ) -> Result<Option<Attendance>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attendance
             WHERE authorization_id = $1 AND attendance_date = $2"
        );
        sqlx::query_as::<_, Attendance>(&query)
            .bind(authorization_id)
            .bind(attendance_date)
            .fetch_optional(pool)
            .await
    }

    /// Insert or overwrite the marks for `(authorization_id, attendance_date)`.
    pub async fn upsert(
        pool: &PgPool,
        authorization_id: DbId,
        attendance_date: Date,
        marks: AttendanceMarks,
    ) -> Result<Attendance, sqlx::Error> {
        let query = format!(
            "INSERT INTO attendance
                (authorization_id, attendance_date, present_outbound, present_return)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT ON CONSTRAINT uq_attendance_authorization_date
             DO UPDATE SET
                present_outbound = EXCLUDED.present_outbound,
                present_return = EXCLUDED.present_return
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Attendance>(&query)
            .bind(authorization_id)
            .bind(attendance_date)
            .bind(marks.present_outbound)
            .bind(marks.present_return)
            .fetch_one(pool)
            .await
    }

    /// All records of one authorization, ordered by date.
    pub async fn list_for_authorization(
        pool: &PgPool,
        authorization_id: DbId,
    ) -> Result<Vec<Attendance>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attendance
             WHERE authorization_id = $1
             ORDER BY attendance_date"
        );
        sqlx::query_as::<_, Attendance>(&query)
            .bind(authorization_id)
            .fetch_all(pool)
            .await
    }

    /// All records of every authorization of one event, ordered by
    /// authorization then date.
    pub async fn list_for_event(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<Attendance>, sqlx::Error> {
        sqlx::query_as::<_, Attendance>(
            "SELECT t.id, t.authorization_id, t.attendance_date, t.present_outbound,
                    t.present_return
             FROM attendance t
             JOIN authorizations a ON a.id = t.authorization_id
             WHERE a.event_id = $1
             ORDER BY t.authorization_id, t.attendance_date",
        )
        .bind(event_id)
        .fetch_all(pool)
        .await
    }
}
