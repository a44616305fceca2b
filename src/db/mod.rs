use anyhow::Result;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::models::DashboardStats;

pub mod attendance;
pub mod employees;
pub mod leaves;
pub mod profiles;

pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .connect(&config.url)
        .await?;

    // Test connection
    sqlx::query("SELECT 1")
        .fetch_one(&pool)
        .await?;

    Ok(pool)
}

pub async fn health_check(pool: &PgPool) -> anyhow::Result<bool> {
    let _result = sqlx::query("SELECT 1")
        .fetch_one(pool)
        .await?;

    Ok(true)
}

/// Reads the dashboard counters from the `v_dashboard` view. The view always
/// has exactly one row; if it is missing the counters fall back to zero.
pub async fn dashboard_stats(pool: &PgPool) -> Result<DashboardStats, sqlx::Error> {
    let stats = sqlx::query_as::<_, DashboardStats>(
        "SELECT total_employees, present_today, on_leave_today FROM v_dashboard",
    )
    .fetch_optional(pool)
    .await?;

    Ok(stats.unwrap_or_default())
}
