use axum::{extract::State, routing::get, Json, Router};

use crate::auth::AuthUser;
use crate::db;
use crate::error::AppResult;
use crate::models::{AppState, DashboardStats};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/dashboard", get(dashboard))
        .with_state(state)
}

async fn dashboard(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<DashboardStats>> {
    let stats = db::dashboard_stats(&state.pool).await?;
    Ok(Json(stats))
}
