use axum::{Router, routing::get};

use super::controller::{
    create_department, delete_department, get_department, get_departments, update_department,
};
use crate::state::AppState;

pub fn init_departments_router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_departments).post(create_department))
        .route(
            "/{id}",
            get(get_department)
                .put(update_department)
                .delete(delete_department),
        )
}
