use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Profile;

/// Role from the caller's profile, if any. Missing profiles and NULL roles
/// both mean the default employee role.
pub async fn find_role(pool: &PgPool, user_id: Uuid) -> Result<Option<String>, sqlx::Error> {
    let role = sqlx::query_scalar::<_, Option<String>>(
        "SELECT role FROM profiles WHERE id = $1 LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(role.flatten())
}

pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query_as::<_, Profile>(
        "SELECT id, role, full_name, email FROM profiles WHERE id = $1 LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
