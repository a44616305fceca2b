//! API Routes
//!
//! This module organizes all HTTP endpoints for the application:
//! - `/api/health` - Health checks
//! - `/api/account` - Caller role and self-registration
//! - `/api/employees` - Directory CRUD, bulk import, export, templates
//! - `/api/attendance` - Daily check-in/check-out
//! - `/api/leaves` - Leave balances and approvals
//! - `/api/dashboard` - Headline counters

pub mod account;
pub mod attendance;
pub mod dashboard;
pub mod employees;
pub mod health;
pub mod leaves;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let origins: Vec<HeaderValue> = state
        .config
        .server
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(health::router(state.clone()))
        .merge(account::router(state.clone()))
        .merge(employees::router(state.clone()))
        .merge(attendance::router(state.clone()))
        .merge(leaves::router(state.clone()))
        .merge(dashboard::router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
