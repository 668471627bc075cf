use axum::{
    Router,
    routing::{delete, get, patch},
};

use super::controller::{
    create_notification, delete_notification, get_notifications, mark_all_read, mark_read,
    unread_count,
};
use crate::state::AppState;

pub fn init_notifications_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_notifications).post(create_notification))
        .route("/unread-count", get(unread_count))
        .route("/read-all", patch(mark_all_read))
        .route("/{id}", delete(delete_notification))
        .route("/{id}/read", patch(mark_read))
}
