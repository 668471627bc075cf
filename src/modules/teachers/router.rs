use axum::{
    Router,
    routing::{get, patch},
};

use super::controller::{
    create_teacher, delete_teacher, get_teacher, get_teachers, grade_permission_history,
    toggle_grade_permission, update_teacher,
};
use crate::state::AppState;

pub fn init_teachers_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_teachers).post(create_teacher))
        .route(
            "/{id}",
            get(get_teacher).put(update_teacher).delete(delete_teacher),
        )
        .route("/{id}/grade-permission", patch(toggle_grade_permission))
        .route("/{id}/grade-permission/history", get(grade_permission_history))
}
