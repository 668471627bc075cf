use axum::{Router, routing::get};

use super::controller::{
    create_attendance, delete_attendance, get_attendance, get_attendance_record,
    update_attendance,
};
use crate::state::AppState;

pub fn init_attendance_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_attendance).post(create_attendance))
        .route(
            "/{id}",
            get(get_attendance_record)
                .put(update_attendance)
                .delete(delete_attendance),
        )
}
