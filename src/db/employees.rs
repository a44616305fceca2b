use sqlx::PgPool;
use uuid::Uuid;

use crate::import::{EmployeeRecord, ImportStore};
use crate::models::{Employee, EmployeeSort, ListEmployeesQuery, SortDir};

pub const PAGE_SIZE: u32 = 10;

const COLUMNS: &str = "id, user_id, full_name, email, nik, employment_status, is_active, created_at";

// Query text is assembled with format! only from these constants and the
// whitelisted sort columns; user input always goes through binds.
const SEARCH_FILTER: &str = "(full_name ILIKE $1 OR email ILIKE $1 OR nik ILIKE $1)";

fn search_pattern(q: Option<&str>) -> Option<String> {
    q.map(str::trim)
        .filter(|needle| !needle.is_empty())
        .map(|needle| format!("%{needle}%"))
}

/// One directory page plus the unpaged match count.
pub async fn list(
    pool: &PgPool,
    query: &ListEmployeesQuery,
) -> Result<(Vec<Employee>, i64), sqlx::Error> {
    let order = format!("{} {}", query.sort.column(), query.dir.keyword());
    let page = query.page.unwrap_or(1).max(1);
    let offset = i64::from(page - 1) * i64::from(PAGE_SIZE);

    match search_pattern(query.q.as_deref()) {
        Some(pattern) => {
            let rows = sqlx::query_as::<_, Employee>(&format!(
                "SELECT {COLUMNS} FROM employees WHERE {SEARCH_FILTER} \
                 ORDER BY {order} LIMIT $2 OFFSET $3"
            ))
            .bind(&pattern)
            .bind(i64::from(PAGE_SIZE))
            .bind(offset)
            .fetch_all(pool)
            .await?;

            let total = sqlx::query_scalar::<_, i64>(&format!(
                "SELECT COUNT(*) FROM employees WHERE {SEARCH_FILTER}"
            ))
            .bind(&pattern)
            .fetch_one(pool)
            .await?;

            Ok((rows, total))
        }
        None => {
            let rows = sqlx::query_as::<_, Employee>(&format!(
                "SELECT {COLUMNS} FROM employees ORDER BY {order} LIMIT $1 OFFSET $2"
            ))
            .bind(i64::from(PAGE_SIZE))
            .bind(offset)
            .fetch_all(pool)
            .await?;

            let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM employees")
                .fetch_one(pool)
                .await?;

            Ok((rows, total))
        }
    }
}

/// Same filter and ordering as `list` but without pagination, for exports.
pub async fn list_all(
    pool: &PgPool,
    q: Option<&str>,
    sort: EmployeeSort,
    dir: SortDir,
) -> Result<Vec<Employee>, sqlx::Error> {
    let order = format!("{} {}", sort.column(), dir.keyword());

    match search_pattern(q) {
        Some(pattern) => {
            sqlx::query_as::<_, Employee>(&format!(
                "SELECT {COLUMNS} FROM employees WHERE {SEARCH_FILTER} ORDER BY {order}"
            ))
            .bind(&pattern)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Employee>(&format!(
                "SELECT {COLUMNS} FROM employees ORDER BY {order}"
            ))
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>(&format!("SELECT {COLUMNS} FROM employees WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Latest employee row linked to an account. Accounts normally map to one
/// row, but the newest wins if there are several.
pub async fn find_by_user(pool: &PgPool, user_id: Uuid) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>(&format!(
        "SELECT {COLUMNS} FROM employees \
         WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn find_id_by_user(pool: &PgPool, user_id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM employees WHERE user_id = $1 ORDER BY created_at DESC LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

pub async fn find_id_by_email(pool: &PgPool, email: &str) -> Result<Option<Uuid>, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>("SELECT id FROM employees WHERE email = $1 LIMIT 1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    full_name: &str,
    email: &str,
    nik: Option<&str>,
    employment_status: &str,
    is_active: bool,
) -> Result<Employee, sqlx::Error> {
    sqlx::query_as::<_, Employee>(&format!(
        "INSERT INTO employees (full_name, email, nik, employment_status, is_active) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {COLUMNS}"
    ))
    .bind(full_name)
    .bind(email)
    .bind(nik)
    .bind(employment_status)
    .bind(is_active)
    .fetch_one(pool)
    .await
}

/// Minimal self-registration row for a signed-in account.
pub async fn create_for_user(
    pool: &PgPool,
    user_id: Uuid,
    full_name: &str,
    email: &str,
) -> Result<Employee, sqlx::Error> {
    sqlx::query_as::<_, Employee>(&format!(
        "INSERT INTO employees (user_id, full_name, email, employment_status, is_active) \
         VALUES ($1, $2, $3, 'permanent', true) RETURNING {COLUMNS}"
    ))
    .bind(user_id)
    .bind(full_name)
    .bind(email)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: Uuid,
    full_name: &str,
    email: &str,
    nik: Option<&str>,
    employment_status: &str,
    is_active: bool,
) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>(&format!(
        "UPDATE employees \
         SET full_name = $2, email = $3, nik = $4, employment_status = $5, is_active = $6 \
         WHERE id = $1 RETURNING {COLUMNS}"
    ))
    .bind(id)
    .bind(full_name)
    .bind(email)
    .bind(nik)
    .bind(employment_status)
    .bind(is_active)
    .fetch_optional(pool)
    .await
}

#[async_trait::async_trait]
impl ImportStore for PgPool {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<Uuid>> {
        Ok(find_id_by_email(self, email).await?)
    }

    async fn insert(&self, record: &EmployeeRecord) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO employees (full_name, email, nik, employment_status, is_active) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&record.full_name)
        .bind(&record.email)
        .bind(record.nik.as_deref())
        .bind(&record.employment_status)
        .bind(record.is_active)
        .execute(self)
        .await?;
        Ok(())
    }

    async fn update(&self, id: Uuid, record: &EmployeeRecord) -> anyhow::Result<()> {
        // Email stays untouched here, it is the reconciliation key.
        sqlx::query(
            "UPDATE employees \
             SET full_name = $2, nik = $3, employment_status = $4, is_active = $5 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&record.full_name)
        .bind(record.nik.as_deref())
        .bind(&record.employment_status)
        .bind(record.is_active)
        .execute(self)
        .await?;
        Ok(())
    }
}
