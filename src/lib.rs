// Managein - HR backend: employee directory, attendance, leave balances,
// and bulk CSV/XLSX employee import.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod import;
pub mod models;
pub mod routes;

// Re-exports for convenience
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
