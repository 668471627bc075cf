use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use unidesk_core::{AppError, PaginationParams};
use unidesk_models::{
    CreateScheduleDto, MessageResponse, PaginatedSchedulesResponse, Schedule,
    ScheduleFilterParams, UpdateScheduleDto,
};

use super::service::ScheduleService;
use crate::middleware::auth::{
    RequireAuth, RequireCreateSchedule, RequireDeleteSchedule, RequireEditSchedule,
};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::scoping::CourseScope;
use crate::validator::ValidatedJson;

/// List timetable slots. Teachers see slots of the courses they teach;
/// students see their enrolled courses and their group's slots.
#[utoipa::path(
    get,
    path = "/api/schedules",
    params(ScheduleFilterParams, PaginationParams),
    responses(
        (status = 200, description = "List of schedule slots", body = PaginatedSchedulesResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Caller has no linked identity", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Schedules"
)]
#[instrument(skip(state, auth))]
pub async fn get_schedules(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Query(filter): Query<ScheduleFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedSchedulesResponse>, AppError> {
    let scope = CourseScope::for_principal(&auth)?;
    let response = ScheduleService::get_schedules(&state.db, filter, scope, pagination).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/schedules/{id}",
    params(("id" = Uuid, Path, description = "Schedule ID")),
    responses(
        (status = 200, description = "Schedule slot", body = Schedule),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Schedule not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Schedules"
)]
#[instrument(skip(state, auth))]
pub async fn get_schedule(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Schedule>, AppError> {
    let scope = CourseScope::for_principal(&auth)?;
    let schedule = ScheduleService::get_schedule(&state.db, id, scope).await?;
    Ok(Json(schedule))
}

#[utoipa::path(
    post,
    path = "/api/schedules",
    request_body = CreateScheduleDto,
    responses(
        (status = 201, description = "Schedule slot created", body = Schedule),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Course or group not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Schedules"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn create_schedule(
    State(state): State<AppState>,
    RequireCreateSchedule(_auth): RequireCreateSchedule,
    ValidatedJson(dto): ValidatedJson<CreateScheduleDto>,
) -> Result<(StatusCode, Json<Schedule>), AppError> {
    let schedule = ScheduleService::create_schedule(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(schedule)))
}

#[utoipa::path(
    put,
    path = "/api/schedules/{id}",
    params(("id" = Uuid, Path, description = "Schedule ID")),
    request_body = UpdateScheduleDto,
    responses(
        (status = 200, description = "Schedule slot updated", body = Schedule),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Schedule not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Schedules"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn update_schedule(
    State(state): State<AppState>,
    RequireEditSchedule(_auth): RequireEditSchedule,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateScheduleDto>,
) -> Result<Json<Schedule>, AppError> {
    let schedule = ScheduleService::update_schedule(&state.db, id, dto).await?;
    Ok(Json(schedule))
}

#[utoipa::path(
    delete,
    path = "/api/schedules/{id}",
    params(("id" = Uuid, Path, description = "Schedule ID")),
    responses(
        (status = 200, description = "Schedule slot deleted", body = MessageResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Schedule not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Schedules"
)]
#[instrument(skip(state, _auth))]
pub async fn delete_schedule(
    State(state): State<AppState>,
    RequireDeleteSchedule(_auth): RequireDeleteSchedule,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    ScheduleService::delete_schedule(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Schedule deleted successfully")))
}
