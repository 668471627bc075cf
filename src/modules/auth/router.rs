use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{login, logout, me};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
}
