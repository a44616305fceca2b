use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use chrono::Datelike;
use tracing::info;
use uuid::Uuid;

use crate::auth::{resolve_actor, AuthUser};
use crate::db;
use crate::error::{AppError, AppResult};
use crate::models::{AppState, BalanceQuery, LeaveBalance};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/leaves/balance", get(balance))
        .route("/api/leaves/{id}/approve", post(approve))
        .with_state(state)
}

/// Ensures and returns the year's leave balance. Without an explicit
/// `employee_id` the caller's own row is used.
async fn balance(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<BalanceQuery>,
) -> AppResult<Json<Option<LeaveBalance>>> {
    let employee_id = match query.employee_id {
        Some(id) => id,
        None => db::employees::find_id_by_user(&state.pool, user.id)
            .await?
            .ok_or_else(|| AppError::BadRequest("No employee id".to_string()))?,
    };
    let year = query
        .year
        .unwrap_or_else(|| chrono::Utc::now().year());

    db::leaves::ensure_balance(&state.pool, employee_id, year, db::leaves::DEFAULT_QUOTA).await?;
    let row = db::leaves::find_balance(&state.pool, employee_id, year).await?;

    Ok(Json(row))
}

/// Approves a leave request through the database function. Its error text
/// carries the business reason (already approved, quota exceeded, ...) and
/// is handed back as a client error.
async fn approve(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<serde_json::Value>> {
    let actor = resolve_actor(&state.pool, &user).await?;
    actor.require_approver("Forbidden")?;

    db::leaves::approve(&state.pool, id, actor.user_id)
        .await
        .map_err(|err| AppError::BadRequest(database_message(err)))?;

    info!(leave_id = %id, approver = %actor.user_id, "leave approved");
    Ok(Json(serde_json::json!({ "approved": true })))
}

fn database_message(err: sqlx::Error) -> String {
    match err {
        sqlx::Error::Database(db_err) => db_err.message().to_string(),
        other => other.to_string(),
    }
}
