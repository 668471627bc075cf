use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;

use unidesk_auth::{Authorized, Principal, Requirement, authorize, resolve_principal};
use unidesk_config::JwtConfig;
use unidesk_core::{AppError, Capability};

use crate::metrics::track_authorization_check;
use crate::state::AppState;

/// The raw session token of a request. An `Authorization: Bearer` header
/// wins over the session cookie.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());

    bearer.or_else(|| {
        CookieJar::from_headers(headers)
            .get(cookie_name)
            .map(|cookie| cookie.value().to_string())
    })
}

/// Resolves the principal behind the request headers, if any.
pub fn principal_from_headers(headers: &HeaderMap, jwt_config: &JwtConfig) -> Option<Principal> {
    let token = session_token(headers, &jwt_config.cookie_name);
    resolve_principal(token.as_deref(), jwt_config)
}

/// Runs one guard and records the outcome.
pub fn guard(principal: Option<&Principal>, requirement: Requirement) -> Result<Authorized, AppError> {
    let result = authorize(principal, requirement);
    let role = principal.map_or("anonymous", |p| p.role.as_str());
    track_authorization_check(role, requirement.label(), result.is_authorized());
    result.into_result()
}

/// The current session, if one resolves. Never rejects.
#[derive(Debug, Clone)]
pub struct Session(pub Option<Principal>);

impl FromRequestParts<AppState> for Session {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Session(principal_from_headers(&parts.headers, &state.jwt_config)))
    }
}

/// Declares an extractor that rejects unless the session satisfies a
/// [`Requirement`]. The wrapped [`Authorized`] carries the principal forward.
#[macro_export]
macro_rules! require {
    ($name:ident, $requirement:expr) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub unidesk_auth::Authorized);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = unidesk_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let principal =
                    $crate::middleware::auth::principal_from_headers(&parts.headers, &state.jwt_config);
                $crate::middleware::auth::guard(principal.as_ref(), $requirement).map($name)
            }
        }
    };
}

require!(RequireAuth, Requirement::Authenticated);
require!(RequireAdmin, Requirement::Admin);
require!(RequireAdminOrTeacher, Requirement::AdminOrTeacher);

// Students
require!(RequireViewAllStudents, Requirement::Capability(Capability::ViewAllStudents));

// Teachers
require!(RequireViewAllTeachers, Requirement::Capability(Capability::ViewAllTeachers));

// Departments
require!(RequireViewDepartments, Requirement::Capability(Capability::ViewDepartments));
require!(RequireViewAllDepartments, Requirement::Capability(Capability::ViewAllDepartments));

// Groups
require!(RequireViewGroups, Requirement::Capability(Capability::ViewGroups));
require!(RequireViewAllGroups, Requirement::Capability(Capability::ViewAllGroups));
require!(RequireCreateGroup, Requirement::Capability(Capability::CreateGroup));
require!(RequireEditGroup, Requirement::Capability(Capability::EditGroup));
require!(RequireDeleteGroup, Requirement::Capability(Capability::DeleteGroup));

// Courses
require!(RequireViewCourses, Requirement::Capability(Capability::ViewCourses));
require!(RequireCreateCourse, Requirement::Capability(Capability::CreateCourse));
require!(RequireEditCourse, Requirement::Capability(Capability::EditCourse));
require!(RequireDeleteCourse, Requirement::Capability(Capability::DeleteCourse));

// Grades
require!(RequireEditGrades, Requirement::Capability(Capability::EditGrades));
require!(RequireDeleteGrades, Requirement::Capability(Capability::DeleteGrades));

// Schedules
require!(RequireCreateSchedule, Requirement::Capability(Capability::CreateSchedule));
require!(RequireEditSchedule, Requirement::Capability(Capability::EditSchedule));
require!(RequireDeleteSchedule, Requirement::Capability(Capability::DeleteSchedule));

// Attendance
require!(RequireEditAttendance, Requirement::Capability(Capability::EditAttendance));
require!(RequireDeleteAttendance, Requirement::Capability(Capability::DeleteAttendance));

// Notifications
require!(RequireCreateNotification, Requirement::Capability(Capability::CreateNotification));
