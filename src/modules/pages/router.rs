use axum::{Router, middleware, routing::get};

use unidesk_core::permissions::{LANDING_PATH, PROTECTED_SECTIONS};

use super::controller::{landing, section_page};
use crate::middleware::route_guard::page_guard;
use crate::state::AppState;

/// Section pages sit behind the route guard; the landing page is public.
pub fn init_pages_router(state: AppState) -> Router<AppState> {
    let sections = PROTECTED_SECTIONS
        .iter()
        .fold(Router::<AppState>::new(), |router, section| {
            router
                .route(section, get(section_page))
                .route(&format!("{section}/{{*rest}}"), get(section_page))
        })
        .route_layer(middleware::from_fn_with_state(state, page_guard));

    Router::new()
        .route(LANDING_PATH, get(landing))
        .merge(sections)
}
