//! In-app notifications. The recipient is a teacher or student record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use unidesk_core::PaginationMeta;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub read_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct CreateNotificationDto {
    pub recipient_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 5000))]
    pub message: String,
}

#[derive(Deserialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NotificationFilterParams {
    /// Only unread notifications
    pub unread_only: Option<bool>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedNotificationsResponse {
    pub data: Vec<Notification>,
    pub meta: PaginationMeta,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct UnreadCountResponse {
    pub count: i64,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct MarkAllReadResponse {
    /// Number of notifications flipped to read
    pub updated: u64,
}
