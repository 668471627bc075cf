use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use unidesk_core::{AppError, PaginationParams};
use unidesk_models::{
    CreateDepartmentDto, Department, MessageResponse, PaginatedDepartmentsResponse,
    UpdateDepartmentDto,
};

use super::service::DepartmentService;
use crate::middleware::auth::{RequireAdmin, RequireViewAllDepartments, RequireViewDepartments};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/departments",
    params(PaginationParams),
    responses(
        (status = 200, description = "List of departments", body = PaginatedDepartmentsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Departments"
)]
#[instrument(skip(state, _auth))]
pub async fn get_departments(
    State(state): State<AppState>,
    RequireViewAllDepartments(_auth): RequireViewAllDepartments,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedDepartmentsResponse>, AppError> {
    let response = DepartmentService::get_departments(&state.db, pagination).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/departments/{id}",
    params(("id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department details", body = Department),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Department not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Departments"
)]
#[instrument(skip(state, _auth))]
pub async fn get_department(
    State(state): State<AppState>,
    RequireViewDepartments(_auth): RequireViewDepartments,
    Path(id): Path<Uuid>,
) -> Result<Json<Department>, AppError> {
    let department = DepartmentService::get_department(&state.db, id).await?;
    Ok(Json(department))
}

#[utoipa::path(
    post,
    path = "/api/departments",
    request_body = CreateDepartmentDto,
    responses(
        (status = 201, description = "Department created", body = Department),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Departments"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn create_department(
    State(state): State<AppState>,
    RequireAdmin(_auth): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateDepartmentDto>,
) -> Result<(StatusCode, Json<Department>), AppError> {
    let department = DepartmentService::create_department(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(department)))
}

#[utoipa::path(
    put,
    path = "/api/departments/{id}",
    params(("id" = Uuid, Path, description = "Department ID")),
    request_body = UpdateDepartmentDto,
    responses(
        (status = 200, description = "Department updated", body = Department),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Department not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Departments"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn update_department(
    State(state): State<AppState>,
    RequireAdmin(_auth): RequireAdmin,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateDepartmentDto>,
) -> Result<Json<Department>, AppError> {
    let department = DepartmentService::update_department(&state.db, id, dto).await?;
    Ok(Json(department))
}

#[utoipa::path(
    delete,
    path = "/api/departments/{id}",
    params(("id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department deleted", body = MessageResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Department not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Departments"
)]
#[instrument(skip(state, _auth))]
pub async fn delete_department(
    State(state): State<AppState>,
    RequireAdmin(_auth): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    DepartmentService::delete_department(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Department deleted successfully")))
}
