//! Page navigation gate.
//!
//! Runs before any page under a protected section renders. Paths outside
//! the protected sections bypass the gate entirely.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use unidesk_auth::Principal;
use unidesk_core::permissions::{LANDING_PATH, can_access_route, is_protected_path};

use crate::metrics::track_page_redirect;
use crate::middleware::auth::principal_from_headers;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Not a protected section.
    Bypass,
    Allow,
    Redirect(&'static str),
}

pub fn evaluate_navigation(path: &str, principal: Option<&Principal>) -> NavigationDecision {
    if !is_protected_path(path) {
        return NavigationDecision::Bypass;
    }

    let Some(principal) = principal else {
        return NavigationDecision::Redirect(LANDING_PATH);
    };

    if can_access_route(principal.role, path) {
        NavigationDecision::Allow
    } else {
        NavigationDecision::Redirect(LANDING_PATH)
    }
}

pub async fn page_guard(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let principal = principal_from_headers(req.headers(), &state.jwt_config);
    let path = req.uri().path().to_owned();

    match evaluate_navigation(&path, principal.as_ref()) {
        NavigationDecision::Bypass | NavigationDecision::Allow => next.run(req).await,
        NavigationDecision::Redirect(target) => {
            let reason = if principal.is_some() { "forbidden" } else { "anonymous" };
            tracing::debug!(path = %path, reason, "redirecting page navigation");
            track_page_redirect(reason);
            Redirect::to(target).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unidesk_core::Role;
    use uuid::Uuid;

    fn principal(role: Role) -> Principal {
        Principal {
            id: Uuid::new_v4(),
            email: "p@uni.test".to_string(),
            role,
            related_id: None,
        }
    }

    #[test]
    fn test_unprotected_paths_bypass() {
        assert_eq!(evaluate_navigation("/", None), NavigationDecision::Bypass);
        assert_eq!(evaluate_navigation("/about", None), NavigationDecision::Bypass);
        assert_eq!(
            evaluate_navigation("/studentship", None),
            NavigationDecision::Bypass
        );
    }

    #[test]
    fn test_anonymous_is_redirected() {
        assert_eq!(
            evaluate_navigation("/grades", None),
            NavigationDecision::Redirect("/")
        );
    }

    #[test]
    fn test_student_cannot_open_students() {
        let student = principal(Role::Student);
        assert_eq!(
            evaluate_navigation("/students/123", Some(&student)),
            NavigationDecision::Redirect("/")
        );
        assert_eq!(
            evaluate_navigation("/grades/123", Some(&student)),
            NavigationDecision::Allow
        );
    }

    #[test]
    fn test_teacher_cannot_open_teachers() {
        let teacher = principal(Role::Teacher);
        assert_eq!(
            evaluate_navigation("/teachers", Some(&teacher)),
            NavigationDecision::Redirect("/")
        );
        assert_eq!(
            evaluate_navigation("/students/123", Some(&teacher)),
            NavigationDecision::Allow
        );
    }

    #[test]
    fn test_admin_opens_everything() {
        let admin = principal(Role::Admin);
        for section in unidesk_core::permissions::PROTECTED_SECTIONS {
            assert_eq!(
                evaluate_navigation(section, Some(&admin)),
                NavigationDecision::Allow
            );
        }
    }
}
