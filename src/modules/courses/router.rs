use axum::{
    Router,
    routing::{delete, get, post},
};

use super::controller::{
    create_course, delete_course, enroll_student, get_course, get_courses, unenroll_student,
    update_course,
};
use crate::state::AppState;

pub fn init_courses_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_courses).post(create_course))
        .route(
            "/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .route("/{id}/enrollments", post(enroll_student))
        .route("/{id}/enrollments/{student_id}", delete(unenroll_student))
}
