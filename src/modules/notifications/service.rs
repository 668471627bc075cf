//! Notification storage. Every query except creation is keyed by the
//! recipient so one caller can never read or flip another's notifications.

use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use unidesk_core::{AppError, PaginationParams};
use unidesk_db::{ensure_affected, map_db_error};
use unidesk_models::{
    CreateNotificationDto, Notification, NotificationFilterParams,
    PaginatedNotificationsResponse,
};

const NOTIFICATION_COLUMNS: &str = "id, recipient_id, title, message, is_read, created_at, read_at";

pub struct NotificationService;

impl NotificationService {
    #[instrument(skip(db))]
    pub async fn get_notifications(
        db: &PgPool,
        recipient_id: Uuid,
        filter: NotificationFilterParams,
        pagination: PaginationParams,
    ) -> Result<PaginatedNotificationsResponse, AppError> {
        let unread_only = filter.unread_only.unwrap_or(false);

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND (NOT $2 OR NOT is_read)",
        )
        .bind(recipient_id)
        .bind(unread_only)
        .fetch_one(db)
        .await?;

        let notifications = sqlx::query_as::<_, Notification>(&format!(
            r#"SELECT {NOTIFICATION_COLUMNS} FROM notifications
               WHERE recipient_id = $1 AND (NOT $2 OR NOT is_read)
               ORDER BY created_at DESC LIMIT $3 OFFSET $4"#
        ))
        .bind(recipient_id)
        .bind(unread_only)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(db)
        .await?;

        Ok(PaginatedNotificationsResponse {
            data: notifications,
            meta: pagination.meta(total),
        })
    }

    #[instrument(skip(db, dto), fields(recipient_id = %dto.recipient_id))]
    pub async fn create_notification(
        db: &PgPool,
        dto: CreateNotificationDto,
    ) -> Result<Notification, AppError> {
        sqlx::query_as::<_, Notification>(&format!(
            r#"INSERT INTO notifications (recipient_id, title, message)
               VALUES ($1, $2, $3)
               RETURNING {NOTIFICATION_COLUMNS}"#
        ))
        .bind(dto.recipient_id)
        .bind(&dto.title)
        .bind(&dto.message)
        .fetch_one(db)
        .await
        .map_err(|e| map_db_error(e, "Duplicate notification"))
    }

    /// Marks one notification read. Already-read notifications keep their
    /// original `read_at`.
    #[instrument(skip(db))]
    pub async fn mark_read(
        db: &PgPool,
        id: Uuid,
        recipient_id: Uuid,
    ) -> Result<Notification, AppError> {
        sqlx::query_as::<_, Notification>(&format!(
            r#"UPDATE notifications
               SET is_read = TRUE, read_at = COALESCE(read_at, NOW())
               WHERE id = $1 AND recipient_id = $2
               RETURNING {NOTIFICATION_COLUMNS}"#
        ))
        .bind(id)
        .bind(recipient_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Notification not found")))
    }

    /// Flips every unread notification of `recipient_id`; returns how many
    /// changed.
    #[instrument(skip(db))]
    pub async fn mark_all_read(db: &PgPool, recipient_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"UPDATE notifications
               SET is_read = TRUE, read_at = NOW()
               WHERE recipient_id = $1 AND is_read = FALSE"#,
        )
        .bind(recipient_id)
        .execute(db)
        .await?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(db))]
    pub async fn unread_count(db: &PgPool, recipient_id: Uuid) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE recipient_id = $1 AND is_read = FALSE",
        )
        .bind(recipient_id)
        .fetch_one(db)
        .await?;

        Ok(count)
    }

    #[instrument(skip(db))]
    pub async fn delete_notification(
        db: &PgPool,
        id: Uuid,
        recipient_id: Uuid,
    ) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM notifications WHERE id = $1 AND recipient_id = $2")
            .bind(id)
            .bind(recipient_id)
            .execute(db)
            .await?;
        ensure_affected(result.rows_affected(), "Notification")
    }
}
