use sqlx::PgPool;
use uuid::Uuid;

use crate::models::LeaveBalance;

/// Default yearly leave quota handed to `ensure_leave_balance`.
pub const DEFAULT_QUOTA: i32 = 12;

/// Creates the year's balance row if it does not exist yet. The function
/// lives in the database so concurrent callers cannot double-insert.
pub async fn ensure_balance(
    pool: &PgPool,
    employee_id: Uuid,
    year: i32,
    quota: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT ensure_leave_balance($1, $2, $3)")
        .bind(employee_id)
        .bind(year)
        .bind(quota)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn find_balance(
    pool: &PgPool,
    employee_id: Uuid,
    year: i32,
) -> Result<Option<LeaveBalance>, sqlx::Error> {
    sqlx::query_as::<_, LeaveBalance>(
        "SELECT id, employee_id, year, quota, used, updated_at \
         FROM leave_balances WHERE employee_id = $1 AND year = $2 LIMIT 1",
    )
    .bind(employee_id)
    .bind(year)
    .fetch_optional(pool)
    .await
}

/// Approves a leave request atomically. The database function revalidates
/// the request state and balance, raising an error when the approval is
/// not allowed; that message is surfaced to the caller as-is.
pub async fn approve(
    pool: &PgPool,
    leave_id: Uuid,
    approver: Uuid,
) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT approve_leave($1, $2)")
        .bind(leave_id)
        .bind(approver)
        .execute(pool)
        .await?;
    Ok(())
}
