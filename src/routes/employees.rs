use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::info;
use uuid::Uuid;

use crate::auth::{resolve_actor, AuthUser};
use crate::db;
use crate::error::{AppError, AppResult};
use crate::export::{employees_csv, employees_xlsx, TEMPLATE_CSV};
use crate::import::{is_valid_email, run_import, ImportSummary, UploadedFile};
use crate::models::{
    AppState, Employee, EmployeeListResponse, EmployeePayload, ExportFormat, ExportQuery,
    ListEmployeesQuery,
};

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/employees", get(list_employees).post(create_employee))
        .route("/api/employees/import", post(import_employees))
        .route("/api/employees/export", get(export_employees))
        .route("/api/employees/template", get(template_csv))
        .route("/api/employees/template.xlsx", get(template_xlsx))
        .route("/api/employees/{id}", get(get_employee).put(update_employee))
        .with_state(state)
}

async fn list_employees(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<ListEmployeesQuery>,
) -> AppResult<Json<EmployeeListResponse>> {
    let (rows, total) = db::employees::list(&state.pool, &query).await?;
    Ok(Json(EmployeeListResponse { rows, total }))
}

async fn get_employee(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Employee>> {
    let employee = db::employees::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Karyawan tidak ditemukan".to_string()))?;
    Ok(Json(employee))
}

async fn create_employee(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<EmployeePayload>,
) -> AppResult<(StatusCode, Json<Employee>)> {
    let actor = resolve_actor(&state.pool, &user).await?;
    actor.require_approver("Forbidden")?;

    let input = normalize_payload(payload)?;
    let employee = db::employees::create(
        &state.pool,
        &input.full_name,
        &input.email,
        input.nik.as_deref(),
        &input.employment_status,
        input.is_active,
    )
    .await?;

    info!(employee_id = %employee.id, "employee created");
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn update_employee(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<EmployeePayload>,
) -> AppResult<Json<Employee>> {
    let actor = resolve_actor(&state.pool, &user).await?;
    actor.require_approver("Forbidden")?;

    let input = normalize_payload(payload)?;
    let employee = db::employees::update(
        &state.pool,
        id,
        &input.full_name,
        &input.email,
        input.nik.as_deref(),
        &input.employment_status,
        input.is_active,
    )
    .await?
    .ok_or_else(|| AppError::NotFound("Karyawan tidak ditemukan".to_string()))?;

    Ok(Json(employee))
}

/// Bulk import. The role is checked before the body is read; the pipeline
/// itself decides between the summary and the validation report.
async fn import_employees(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<Json<ImportSummary>> {
    let actor = resolve_actor(&state.pool, &user).await?;
    actor.require_approver("Hanya admin/manager yang boleh impor")?;

    let file = read_upload(&mut multipart).await?;
    info!(file = %file.filename, bytes = file.bytes.len(), "employee import received");

    let summary = run_import(&state.pool, &file).await?;
    info!(
        inserted = summary.inserted,
        updated = summary.updated,
        failed = summary.failed,
        "employee import finished"
    );

    Ok(Json(summary))
}

async fn read_upload(multipart: &mut Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;

        return Ok(UploadedFile {
            filename,
            content_type,
            bytes,
        });
    }

    Err(AppError::BadRequest("File tidak ditemukan".to_string()))
}

async fn export_employees(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ExportQuery>,
) -> AppResult<Response> {
    let actor = resolve_actor(&state.pool, &user).await?;
    actor.require_approver("Forbidden")?;

    let rows =
        db::employees::list_all(&state.pool, query.q.as_deref(), query.sort, query.dir).await?;
    let stamp = chrono::Utc::now().timestamp_millis();

    let response = match query.format {
        ExportFormat::Csv => download(
            employees_csv(&rows)?,
            "text/csv; charset=utf-8",
            &format!("employees_{stamp}.csv"),
        ),
        ExportFormat::Xlsx => download(
            employees_xlsx(&rows)?,
            XLSX_MIME,
            &format!("employees_{stamp}.xlsx"),
        ),
    };

    info!(rows = rows.len(), "employee export served");
    Ok(response)
}

async fn template_csv() -> Response {
    download(
        TEMPLATE_CSV.as_bytes().to_vec(),
        "text/csv; charset=utf-8",
        "employees_template.csv",
    )
}

async fn template_xlsx() -> AppResult<Response> {
    let bytes = crate::export::template_xlsx()?;
    Ok(download(bytes, XLSX_MIME, "employees_template.xlsx"))
}

fn download(bytes: Vec<u8>, content_type: &str, filename: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
        bytes,
    )
        .into_response()
}

#[derive(Debug)]
struct EmployeeInput {
    full_name: String,
    email: String,
    nik: Option<String>,
    employment_status: String,
    is_active: bool,
}

/// Same normalization the bulk import applies, with the first failure
/// reported on its own since the payload is a single record.
fn normalize_payload(payload: EmployeePayload) -> Result<EmployeeInput, AppError> {
    let full_name = payload.full_name.trim().to_string();
    if full_name.is_empty() {
        return Err(AppError::BadRequest("Nama wajib diisi.".to_string()));
    }

    let email = payload.email.trim().to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::BadRequest("Email tidak valid.".to_string()));
    }

    let nik = payload
        .nik
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty());
    let employment_status = payload
        .employment_status
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "permanent".to_string());

    Ok(EmployeeInput {
        full_name,
        email,
        nik,
        employment_status,
        is_active: payload.is_active.unwrap_or(true),
    })
}
