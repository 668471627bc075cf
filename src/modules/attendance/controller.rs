use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use unidesk_core::{AppError, PaginationParams, Role};
use unidesk_models::{
    Attendance, AttendanceFilterParams, CreateAttendanceDto, MessageResponse,
    PaginatedAttendanceResponse, UpdateAttendanceDto,
};

use super::service::AttendanceService;
use crate::middleware::auth::{
    RequireAdminOrTeacher, RequireAuth, RequireDeleteAttendance, RequireEditAttendance,
};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::courses::service::CourseService;
use crate::state::AppState;
use crate::utils::scoping::{scope_attendance_filter, student_owns};
use crate::validator::ValidatedJson;

/// List attendance. Students always receive their own records.
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceFilterParams, PaginationParams),
    responses(
        (status = 200, description = "Attendance records", body = PaginatedAttendanceResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Caller has no linked identity", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state, auth))]
pub async fn get_attendance(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Query(filter): Query<AttendanceFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedAttendanceResponse>, AppError> {
    let filter = scope_attendance_filter(&auth, filter)?;
    let response = AttendanceService::get_attendance(&state.db, filter, pagination).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/attendance/{id}",
    params(("id" = Uuid, Path, description = "Attendance record ID")),
    responses(
        (status = 200, description = "Attendance record", body = Attendance),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Attendance record not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state, auth))]
pub async fn get_attendance_record(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Attendance>, AppError> {
    let record = AttendanceService::get_record(&state.db, id).await?;
    if !student_owns(&auth, record.student_id)? {
        return Err(AppError::not_found(anyhow::anyhow!(
            "Attendance record not found"
        )));
    }
    Ok(Json(record))
}

#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = CreateAttendanceDto,
    responses(
        (status = 201, description = "Attendance recorded", body = Attendance),
        (status = 400, description = "Bad request or duplicate", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Student or course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state, auth, dto))]
pub async fn create_attendance(
    State(state): State<AppState>,
    RequireAdminOrTeacher(auth): RequireAdminOrTeacher,
    ValidatedJson(dto): ValidatedJson<CreateAttendanceDto>,
) -> Result<(StatusCode, Json<Attendance>), AppError> {
    let recorded_by = match auth.role {
        Role::Teacher => {
            let teacher_id = auth.related_id()?;
            CourseService::ensure_teaches(&state.db, teacher_id, dto.course_id).await?;
            Some(teacher_id)
        }
        Role::Admin | Role::Student => None,
    };

    let record = AttendanceService::create_record(&state.db, dto, recorded_by).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    put,
    path = "/api/attendance/{id}",
    params(("id" = Uuid, Path, description = "Attendance record ID")),
    request_body = UpdateAttendanceDto,
    responses(
        (status = 200, description = "Attendance updated", body = Attendance),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Attendance record not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state, auth, dto))]
pub async fn update_attendance(
    State(state): State<AppState>,
    RequireEditAttendance(auth): RequireEditAttendance,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateAttendanceDto>,
) -> Result<Json<Attendance>, AppError> {
    let existing = AttendanceService::get_record(&state.db, id).await?;
    if auth.role == Role::Teacher {
        CourseService::ensure_teaches(&state.db, auth.related_id()?, existing.course_id).await?;
    }

    let record = AttendanceService::update_record(&state.db, existing, dto).await?;
    Ok(Json(record))
}

#[utoipa::path(
    delete,
    path = "/api/attendance/{id}",
    params(("id" = Uuid, Path, description = "Attendance record ID")),
    responses(
        (status = 200, description = "Attendance record deleted", body = MessageResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Attendance record not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Attendance"
)]
#[instrument(skip(state, _auth))]
pub async fn delete_attendance(
    State(state): State<AppState>,
    RequireDeleteAttendance(_auth): RequireDeleteAttendance,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    AttendanceService::delete_record(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Attendance record deleted successfully")))
}
