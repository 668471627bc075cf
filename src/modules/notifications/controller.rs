use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use unidesk_core::{AppError, PaginationParams};
use unidesk_models::{
    CreateNotificationDto, MarkAllReadResponse, MessageResponse, Notification,
    NotificationFilterParams, PaginatedNotificationsResponse, UnreadCountResponse,
};

use super::service::NotificationService;
use crate::middleware::auth::{RequireAuth, RequireCreateNotification};
use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::utils::scoping::notification_recipient;
use crate::validator::ValidatedJson;

/// The caller's notifications, newest first
#[utoipa::path(
    get,
    path = "/api/notifications",
    params(NotificationFilterParams, PaginationParams),
    responses(
        (status = 200, description = "Caller's notifications", body = PaginatedNotificationsResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Caller has no linked identity", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Notifications"
)]
#[instrument(skip(state, auth))]
pub async fn get_notifications(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Query(filter): Query<NotificationFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedNotificationsResponse>, AppError> {
    let recipient_id = notification_recipient(&auth)?;
    let response =
        NotificationService::get_notifications(&state.db, recipient_id, filter, pagination)
            .await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/notifications",
    request_body = CreateNotificationDto,
    responses(
        (status = 201, description = "Notification sent", body = Notification),
        (status = 400, description = "Bad request", body = ErrorResponse),
        (status = 403, description = "Forbidden", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Notifications"
)]
#[instrument(skip(state, _auth, dto))]
pub async fn create_notification(
    State(state): State<AppState>,
    RequireCreateNotification(_auth): RequireCreateNotification,
    ValidatedJson(dto): ValidatedJson<CreateNotificationDto>,
) -> Result<(StatusCode, Json<Notification>), AppError> {
    let notification = NotificationService::create_notification(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(notification)))
}

#[utoipa::path(
    get,
    path = "/api/notifications/unread-count",
    responses(
        (status = 200, description = "Number of unread notifications", body = UnreadCountResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Caller has no linked identity", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Notifications"
)]
#[instrument(skip(state, auth))]
pub async fn unread_count(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
) -> Result<Json<UnreadCountResponse>, AppError> {
    let recipient_id = notification_recipient(&auth)?;
    let count = NotificationService::unread_count(&state.db, recipient_id).await?;
    Ok(Json(UnreadCountResponse { count }))
}

#[utoipa::path(
    patch,
    path = "/api/notifications/read-all",
    responses(
        (status = 200, description = "Number of notifications marked read", body = MarkAllReadResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Caller has no linked identity", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Notifications"
)]
#[instrument(skip(state, auth))]
pub async fn mark_all_read(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
) -> Result<Json<MarkAllReadResponse>, AppError> {
    let recipient_id = notification_recipient(&auth)?;
    let updated = NotificationService::mark_all_read(&state.db, recipient_id).await?;
    Ok(Json(MarkAllReadResponse { updated }))
}

#[utoipa::path(
    patch,
    path = "/api/notifications/{id}/read",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification marked read", body = Notification),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Notifications"
)]
#[instrument(skip(state, auth))]
pub async fn mark_read(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<Notification>, AppError> {
    let recipient_id = notification_recipient(&auth)?;
    let notification = NotificationService::mark_read(&state.db, id, recipient_id).await?;
    Ok(Json(notification))
}

#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    params(("id" = Uuid, Path, description = "Notification ID")),
    responses(
        (status = 200, description = "Notification deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []), ("session_cookie" = [])),
    tag = "Notifications"
)]
#[instrument(skip(state, auth))]
pub async fn delete_notification(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, AppError> {
    let recipient_id = notification_recipient(&auth)?;
    NotificationService::delete_notification(&state.db, id, recipient_id).await?;
    Ok(Json(MessageResponse::new("Notification deleted successfully")))
}
