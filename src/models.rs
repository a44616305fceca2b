use sqlx::PgPool;

use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Config,
}

// Database rows. FromRow feeds the runtime query_as calls; the schema is
// owned by the database platform, so the compile-time checked macros are
// not used here.

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct Employee {
    pub id: uuid::Uuid,
    pub user_id: Option<uuid::Uuid>,
    pub full_name: String,
    pub email: String,
    pub nik: Option<String>,
    pub employment_status: String,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct Profile {
    pub id: uuid::Uuid,
    pub role: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct Attendance {
    pub id: uuid::Uuid,
    pub employee_id: uuid::Uuid,
    pub date: chrono::NaiveDate,
    pub check_in: Option<chrono::DateTime<chrono::Utc>>,
    pub check_out: Option<chrono::DateTime<chrono::Utc>>,
    pub status: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, sqlx::FromRow)]
pub struct LeaveBalance {
    pub id: uuid::Uuid,
    pub employee_id: uuid::Uuid,
    pub year: i32,
    pub quota: i32,
    pub used: i32,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// One-row summary backing the dashboard cards (`v_dashboard` view).
#[derive(Debug, Clone, Default, serde::Serialize, sqlx::FromRow)]
pub struct DashboardStats {
    pub total_employees: i64,
    pub present_today: i64,
    pub on_leave_today: i64,
}

// API request/response types

/// Create/update body for a single employee; the list import goes through
/// `import::run_import` instead.
#[derive(Debug, serde::Deserialize)]
pub struct EmployeePayload {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub nik: Option<String>,
    #[serde(default)]
    pub employment_status: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeSort {
    #[default]
    FullName,
    Email,
    CreatedAt,
}

impl EmployeeSort {
    /// Whitelisted ORDER BY column; query text is assembled from these
    /// constants only, never from raw user input.
    pub fn column(self) -> &'static str {
        match self {
            EmployeeSort::FullName => "full_name",
            EmployeeSort::Email => "email",
            EmployeeSort::CreatedAt => "created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn keyword(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct ListEmployeesQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub sort: EmployeeSort,
    #[serde(default)]
    pub dir: SortDir,
    #[serde(default)]
    pub page: Option<u32>,
}

#[derive(Debug, serde::Serialize)]
pub struct EmployeeListResponse {
    pub rows: Vec<Employee>,
    pub total: i64,
}

#[derive(Debug, Clone, Copy, Default, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub sort: EmployeeSort,
    #[serde(default)]
    pub dir: SortDir,
}

#[derive(Debug, serde::Serialize)]
pub struct RoleResponse {
    pub user_id: uuid::Uuid,
    pub email: Option<String>,
    pub role: String,
    pub is_admin: bool,
    pub is_manager: bool,
    pub is_approver: bool,
    pub employee_id: Option<uuid::Uuid>,
}

#[derive(Debug, serde::Serialize)]
pub struct EnsureEmployeeResponse {
    pub created: bool,
}

/// Caller's own employee row plus today's attendance, if any.
#[derive(Debug, serde::Serialize)]
pub struct TodayAttendanceResponse {
    pub employee: Employee,
    pub attendance: Option<Attendance>,
}

#[derive(Debug, serde::Deserialize)]
pub struct BalanceQuery {
    #[serde(default)]
    pub employee_id: Option<uuid::Uuid>,
    #[serde(default)]
    pub year: Option<i32>,
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub database: String,
}
