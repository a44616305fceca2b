// JWT verification and role resolution.
//
// Tokens are issued by the identity platform and verified here with the
// shared HS256 secret. The role itself is not trusted from the token: it
// is looked up in `profiles` on every request that needs it.

pub mod extractor;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, AppResult};

pub use extractor::AuthUser;

/// Claims carried by an access token. Audience and expiry are enforced by
/// the decoder itself, so only the fields we read afterwards are kept.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: i64,
}

pub fn verify_token(secret: &str, audience: &str, token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[audience]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|err| {
        tracing::debug!(error = %err, "token verification failed");
        AppError::Unauthorized
    })?;

    Ok(data.claims)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Manager,
    Employee,
}

impl Role {
    /// Unknown or missing roles fall back to the least privileged one.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("admin") => Role::Admin,
            Some("manager") => Role::Manager,
            _ => Role::Employee,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Employee => "employee",
        }
    }

    pub fn is_approver(self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }
}

/// Authenticated caller with their directory context attached.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub role: Role,
    pub employee_id: Option<Uuid>,
}

impl Actor {
    pub fn is_approver(&self) -> bool {
        self.role.is_approver()
    }

    pub fn require_approver(&self, message: &str) -> AppResult<()> {
        if self.is_approver() {
            Ok(())
        } else {
            Err(AppError::Forbidden(message.to_string()))
        }
    }
}

/// Loads the caller's role and employee row. Both lookups tolerate missing
/// rows: a fresh account has neither a profile role nor an employee record.
pub async fn resolve_actor(pool: &PgPool, user: &AuthUser) -> AppResult<Actor> {
    let role = db::profiles::find_role(pool, user.id).await?;
    let employee_id = db::employees::find_id_by_user(pool, user.id).await?;

    Ok(Actor {
        user_id: user.id,
        email: user.email.clone(),
        role: Role::parse(role.as_deref()),
        employee_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn make_token(secret: &str, aud: &str, exp_offset: i64) -> String {
        let claims = serde_json::json!({
            "sub": "5f8f8b9e-64a2-44f1-bd3a-fd47a5bb1fc8",
            "email": "budi@acme.com",
            "aud": aud,
            "exp": chrono::Utc::now().timestamp() + exp_offset,
        });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn accepts_valid_token() {
        let token = make_token("test-secret", "authenticated", 3600);
        let claims = verify_token("test-secret", "authenticated", &token).unwrap();
        assert_eq!(claims.sub, "5f8f8b9e-64a2-44f1-bd3a-fd47a5bb1fc8");
        assert_eq!(claims.email.as_deref(), Some("budi@acme.com"));
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = make_token("test-secret", "authenticated", 3600);
        assert!(verify_token("other-secret", "authenticated", &token).is_err());
    }

    #[test]
    fn rejects_wrong_audience() {
        let token = make_token("test-secret", "anon", 3600);
        assert!(verify_token("test-secret", "authenticated", &token).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        let token = make_token("test-secret", "authenticated", -3600);
        assert!(verify_token("test-secret", "authenticated", &token).is_err());
    }

    #[test]
    fn unknown_role_falls_back_to_employee() {
        assert_eq!(Role::parse(Some("admin")), Role::Admin);
        assert_eq!(Role::parse(Some("manager")), Role::Manager);
        assert_eq!(Role::parse(Some("intern")), Role::Employee);
        assert_eq!(Role::parse(None), Role::Employee);
    }

    #[test]
    fn approver_roles() {
        assert!(Role::Admin.is_approver());
        assert!(Role::Manager.is_approver());
        assert!(!Role::Employee.is_approver());
    }
}
