use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use unidesk_core::{AppError, Capability, PaginationParams};
use unidesk_models::{
    CreateTeacherDto, GradePermissionAudit, GradePermissionState, MessageResponse,
    PaginatedTeachersResponse, Teacher, TeacherFilterParams, UpdateTeacherDto,
};

use super::service::TeacherService;
use crate::middleware::auth::{RequireAdmin, RequireAuth, RequireViewAllTeachers};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::scoping::ensure_record_access;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/teachers",
    params(TeacherFilterParams, PaginationParams),
    responses(
        (status = 200, description = "List of teachers", body = PaginatedTeachersResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state, _auth))]
pub async fn get_teachers(
    State(state): State<AppState>,
    RequireViewAllTeachers(_auth): RequireViewAllTeachers,
    Query(filter): Query<TeacherFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedTeachersResponse>, AppError> {
    let response = TeacherService::get_teachers(&state.db, filter, pagination).await?;
    Ok(Json(response))
}

/// Get a teacher. Teachers may only read their own record.
#[utoipa::path(
    get,
    path = "/api/teachers/{id}",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher details", body = Teacher),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state, auth))]
pub async fn get_teacher(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Teacher>, AppError> {
    ensure_record_access(&auth, Capability::ViewAllTeachers, Capability::ViewTeachers, id)?;
    let teacher = TeacherService::get_teacher(&state.db, id).await?;
    Ok(Json(teacher))
}

#[utoipa::path(
    post,
    path = "/api/teachers",
    request_body = CreateTeacherDto,
    responses(
        (status = 201, description = "Teacher created", body = Teacher),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn create_teacher(
    State(state): State<AppState>,
    RequireAdmin(_auth): RequireAdmin,
    ValidatedJson(dto): ValidatedJson<CreateTeacherDto>,
) -> Result<(StatusCode, Json<Teacher>), AppError> {
    let teacher = TeacherService::create_teacher(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(teacher)))
}

#[utoipa::path(
    put,
    path = "/api/teachers/{id}",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    request_body = UpdateTeacherDto,
    responses(
        (status = 200, description = "Teacher updated", body = Teacher),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn update_teacher(
    State(state): State<AppState>,
    RequireAdmin(_auth): RequireAdmin,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateTeacherDto>,
) -> Result<Json<Teacher>, AppError> {
    let teacher = TeacherService::update_teacher(&state.db, id, dto).await?;
    Ok(Json(teacher))
}

#[utoipa::path(
    delete,
    path = "/api/teachers/{id}",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher deleted", body = MessageResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state, _auth))]
pub async fn delete_teacher(
    State(state): State<AppState>,
    RequireAdmin(_auth): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    TeacherService::delete_teacher(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Teacher deleted successfully")))
}

/// Toggle a teacher's grade-edit override
#[utoipa::path(
    patch,
    path = "/api/teachers/{id}/grade-permission",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "New override value", body = GradePermissionState),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state, auth))]
pub async fn toggle_grade_permission(
    State(state): State<AppState>,
    RequireAdmin(auth): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<GradePermissionState>, AppError> {
    let new_state = TeacherService::toggle_grade_permission(&state.db, id, auth.user_id()).await?;
    Ok(Json(new_state))
}

/// Audit trail of a teacher's grade-edit override, newest first
#[utoipa::path(
    get,
    path = "/api/teachers/{id}/grade-permission/history",
    params(("id" = Uuid, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Audit entries", body = Vec<GradePermissionAudit>),
        (status = 403, description = "Forbidden - admin only", body = ErrorResponse),
        (status = 404, description = "Teacher not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Teachers"
)]
#[instrument(skip(state, _auth))]
pub async fn grade_permission_history(
    State(state): State<AppState>,
    RequireAdmin(_auth): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<GradePermissionAudit>>, AppError> {
    let entries = TeacherService::grade_permission_history(&state.db, id).await?;
    Ok(Json(entries))
}
