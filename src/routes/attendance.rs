use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use sqlx::PgPool;
use tracing::info;

use crate::auth::AuthUser;
use crate::db;
use crate::error::{AppError, AppResult};
use crate::models::{AppState, Attendance, Employee, TodayAttendanceResponse};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/attendance/today", get(today))
        .route("/api/attendance/check-in", post(check_in))
        .route("/api/attendance/check-out", post(check_out))
        .with_state(state)
}

/// Attendance works on the caller's own employee row; accounts without one
/// are told to register first.
async fn require_employee(pool: &PgPool, user: &AuthUser) -> AppResult<Employee> {
    db::employees::find_by_user(pool, user.id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Profil karyawan belum ada.".to_string()))
}

async fn today(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<TodayAttendanceResponse>> {
    let employee = require_employee(&state.pool, &user).await?;
    let date = chrono::Utc::now().date_naive();
    let attendance = db::attendance::find_for_date(&state.pool, employee.id, date).await?;

    Ok(Json(TodayAttendanceResponse {
        employee,
        attendance,
    }))
}

async fn check_in(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Attendance>> {
    let employee = require_employee(&state.pool, &user).await?;
    let now = chrono::Utc::now();
    let row = db::attendance::check_in(&state.pool, employee.id, now.date_naive(), now).await?;

    info!(employee_id = %employee.id, "check-in recorded");
    Ok(Json(row))
}

async fn check_out(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<Attendance>> {
    let employee = require_employee(&state.pool, &user).await?;
    let now = chrono::Utc::now();
    let date = now.date_naive();

    let existing = db::attendance::find_for_date(&state.pool, employee.id, date).await?;
    if existing.and_then(|row| row.check_in).is_none() {
        return Err(AppError::BadRequest(
            "Belum check-in hari ini.".to_string(),
        ));
    }

    let row = db::attendance::check_out(&state.pool, employee.id, date, now)
        .await?
        .ok_or_else(|| AppError::BadRequest("Belum check-in hari ini.".to_string()))?;

    info!(employee_id = %employee.id, "check-out recorded");
    Ok(Json(row))
}
