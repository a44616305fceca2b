use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::info;

use crate::auth::{resolve_actor, AuthUser, Role};
use crate::db;
use crate::error::AppResult;
use crate::models::{AppState, EnsureEmployeeResponse, RoleResponse};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/account/role", get(role))
        .route("/api/account/ensure-employee", post(ensure_employee))
        .with_state(state)
}

async fn role(State(state): State<AppState>, user: AuthUser) -> AppResult<Json<RoleResponse>> {
    let actor = resolve_actor(&state.pool, &user).await?;

    Ok(Json(RoleResponse {
        user_id: actor.user_id,
        email: actor.email.clone(),
        role: actor.role.as_str().to_string(),
        is_admin: actor.role == Role::Admin,
        is_manager: actor.role == Role::Manager,
        is_approver: actor.is_approver(),
        employee_id: actor.employee_id,
    }))
}

/// Creates the caller's employee row if they do not have one yet, taking
/// the name and email from their profile when available.
async fn ensure_employee(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<EnsureEmployeeResponse>> {
    if db::employees::find_id_by_user(&state.pool, user.id)
        .await?
        .is_some()
    {
        return Ok(Json(EnsureEmployeeResponse { created: false }));
    }

    let profile = db::profiles::find_by_id(&state.pool, user.id).await?;
    let full_name = profile
        .as_ref()
        .and_then(|p| p.full_name.clone())
        .or_else(|| user.email.clone())
        .unwrap_or_else(|| "User".to_string());
    let email = profile
        .as_ref()
        .and_then(|p| p.email.clone())
        .or_else(|| user.email.clone())
        .unwrap_or_else(|| "unknown@example.com".to_string());

    db::employees::create_for_user(&state.pool, user.id, &full_name, &email).await?;
    info!(user_id = %user.id, "employee row created for account");

    Ok(Json(EnsureEmployeeResponse { created: true }))
}
