use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Attendance;

const COLUMNS: &str = "id, employee_id, date, check_in, check_out, status";

pub async fn find_for_date(
    pool: &PgPool,
    employee_id: Uuid,
    date: NaiveDate,
) -> Result<Option<Attendance>, sqlx::Error> {
    sqlx::query_as::<_, Attendance>(&format!(
        "SELECT {COLUMNS} FROM attendance WHERE employee_id = $1 AND date = $2"
    ))
    .bind(employee_id)
    .bind(date)
    .fetch_optional(pool)
    .await
}

/// Records a check-in for the given day. Repeating the call moves the
/// check-in time forward and leaves any earlier check-out in place.
pub async fn check_in(
    pool: &PgPool,
    employee_id: Uuid,
    date: NaiveDate,
    at: DateTime<Utc>,
) -> Result<Attendance, sqlx::Error> {
    sqlx::query_as::<_, Attendance>(&format!(
        "INSERT INTO attendance (employee_id, date, check_in, status) \
         VALUES ($1, $2, $3, 'present') \
         ON CONFLICT (employee_id, date) \
         DO UPDATE SET check_in = EXCLUDED.check_in, status = EXCLUDED.status \
         RETURNING {COLUMNS}"
    ))
    .bind(employee_id)
    .bind(date)
    .bind(at)
    .fetch_one(pool)
    .await
}

/// Stamps the check-out time on the day's row. Returns None when there is
/// no attendance row to close.
pub async fn check_out(
    pool: &PgPool,
    employee_id: Uuid,
    date: NaiveDate,
    at: DateTime<Utc>,
) -> Result<Option<Attendance>, sqlx::Error> {
    sqlx::query_as::<_, Attendance>(&format!(
        "UPDATE attendance SET check_out = $3 \
         WHERE employee_id = $1 AND date = $2 RETURNING {COLUMNS}"
    ))
    .bind(employee_id)
    .bind(date)
    .bind(at)
    .fetch_optional(pool)
    .await
}
