use axum::{Router, routing::get};

use super::controller::{
    create_schedule, delete_schedule, get_schedule, get_schedules, update_schedule,
};
use crate::state::AppState;

pub fn init_schedules_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_schedules).post(create_schedule))
        .route(
            "/{id}",
            get(get_schedule)
                .put(update_schedule)
                .delete(delete_schedule),
        )
}
