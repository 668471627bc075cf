use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use unidesk_core::{AppError, Capability, PaginationParams};
use unidesk_models::{
    CreateGroupDto, GroupFilterParams, MessageResponse, PaginatedGroupsResponse,
    PaginatedStudentsResponse, StudentFilterParams, StudentGroup, UpdateGroupDto,
};

use super::service::GroupService;
use crate::middleware::auth::{
    RequireCreateGroup, RequireDeleteGroup, RequireEditGroup, RequireViewAllGroups,
    RequireViewAllStudents, RequireViewGroups,
};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

#[utoipa::path(
    get,
    path = "/api/groups",
    params(GroupFilterParams, PaginationParams),
    responses(
        (status = 200, description = "List of groups", body = PaginatedGroupsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Groups"
)]
#[instrument(skip(state, _auth))]
pub async fn get_groups(
    State(state): State<AppState>,
    RequireViewAllGroups(_auth): RequireViewAllGroups,
    Query(filter): Query<GroupFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedGroupsResponse>, AppError> {
    let response = GroupService::get_groups(&state.db, filter, pagination).await?;
    Ok(Json(response))
}

/// Get a group. Without `canViewAllGroups` only the caller's own group is
/// visible; any other id is reported as not found.
#[utoipa::path(
    get,
    path = "/api/groups/{id}",
    params(("id" = Uuid, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group details", body = StudentGroup),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Groups"
)]
#[instrument(skip(state, auth))]
pub async fn get_group(
    State(state): State<AppState>,
    RequireViewGroups(auth): RequireViewGroups,
    Path(id): Path<Uuid>,
) -> Result<Json<StudentGroup>, AppError> {
    let member = if auth.can(Capability::ViewAllGroups) {
        None
    } else {
        Some(auth.related_id()?)
    };
    let group = GroupService::get_group(&state.db, id, member).await?;
    Ok(Json(group))
}

#[utoipa::path(
    post,
    path = "/api/groups",
    request_body = CreateGroupDto,
    responses(
        (status = 201, description = "Group created", body = StudentGroup),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Groups"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn create_group(
    State(state): State<AppState>,
    RequireCreateGroup(_auth): RequireCreateGroup,
    ValidatedJson(dto): ValidatedJson<CreateGroupDto>,
) -> Result<(StatusCode, Json<StudentGroup>), AppError> {
    let group = GroupService::create_group(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

#[utoipa::path(
    put,
    path = "/api/groups/{id}",
    params(("id" = Uuid, Path, description = "Group ID")),
    request_body = UpdateGroupDto,
    responses(
        (status = 200, description = "Group updated", body = StudentGroup),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Groups"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn update_group(
    State(state): State<AppState>,
    RequireEditGroup(_auth): RequireEditGroup,
    Path(id): Path<Uuid>,
    ValidatedJson(dto): ValidatedJson<UpdateGroupDto>,
) -> Result<Json<StudentGroup>, AppError> {
    let group = GroupService::update_group(&state.db, id, dto).await?;
    Ok(Json(group))
}

#[utoipa::path(
    delete,
    path = "/api/groups/{id}",
    params(("id" = Uuid, Path, description = "Group ID")),
    responses(
        (status = 200, description = "Group deleted", body = MessageResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Groups"
)]
#[instrument(skip(state, _auth))]
pub async fn delete_group(
    State(state): State<AppState>,
    RequireDeleteGroup(_auth): RequireDeleteGroup,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    GroupService::delete_group(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Group deleted successfully")))
}

/// Students belonging to a group
#[utoipa::path(
    get,
    path = "/api/groups/{id}/students",
    params(("id" = Uuid, Path, description = "Group ID"), PaginationParams),
    responses(
        (status = 200, description = "Group members", body = PaginatedStudentsResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse),
        (status = 404, description = "Group not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Groups"
)]
#[instrument(skip(state, _auth))]
pub async fn get_group_students(
    State(state): State<AppState>,
    RequireViewAllStudents(_auth): RequireViewAllStudents,
    Path(id): Path<Uuid>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedStudentsResponse>, AppError> {
    GroupService::get_group(&state.db, id, None).await?;

    let filter = StudentFilterParams {
        group_id: Some(id),
        search: None,
    };
    let response = StudentService::get_students(&state.db, filter, pagination).await?;
    Ok(Json(response))
}
