//! Authorization guards.
//!
//! Every guard is the same check: a principal must resolve, then its role
//! must satisfy a [`Requirement`]. The outcome is an [`AuthResult`] value;
//! a denial is never an error path of its own.
//!
//! ```ignore
//! let auth = require_permission(principal.as_ref(), Capability::ViewAllStudents).into_result()?;
//! let filter = match auth.role { ... };
//! ```

use axum::http::StatusCode;
use uuid::Uuid;

use unidesk_core::permissions::{Capability, Role};
use unidesk_core::AppError;

use crate::principal::Principal;

pub const UNAUTHORIZED: &str = "unauthorized";
pub const ADMIN_REQUIRED: &str = "admin access required";
pub const ADMIN_OR_TEACHER_REQUIRED: &str = "admin or teacher access required";

/// What a guard demands of the resolved principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Authenticated,
    Admin,
    AdminOrTeacher,
    Capability(Capability),
}

impl Requirement {
    pub fn is_satisfied_by(self, role: Role) -> bool {
        match self {
            Requirement::Authenticated => true,
            Requirement::Admin => role == Role::Admin,
            Requirement::AdminOrTeacher => matches!(role, Role::Admin | Role::Teacher),
            Requirement::Capability(capability) => role.can(capability),
        }
    }

    /// Short label, used for logs and metrics.
    pub fn label(self) -> &'static str {
        match self {
            Requirement::Authenticated => "auth",
            Requirement::Admin => "admin",
            Requirement::AdminOrTeacher => "admin_or_teacher",
            Requirement::Capability(capability) => capability.name(),
        }
    }

    fn forbidden_message(self) -> String {
        match self {
            Requirement::Authenticated => UNAUTHORIZED.to_string(),
            Requirement::Admin => ADMIN_REQUIRED.to_string(),
            Requirement::AdminOrTeacher => ADMIN_OR_TEACHER_REQUIRED.to_string(),
            Requirement::Capability(capability) => {
                format!("missing permission: {}", capability.name())
            }
        }
    }
}

/// The principal and role a handler proceeds with once a guard passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authorized {
    pub role: Role,
    pub principal: Principal,
}

impl Authorized {
    pub fn user_id(&self) -> Uuid {
        self.principal.id
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.role.can(capability)
    }

    /// See [`Principal::require_related_id`].
    pub fn related_id(&self) -> Result<Uuid, AppError> {
        self.principal.require_related_id()
    }
}

/// Outcome of a guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    Authorized { role: Role, principal: Principal },
    Denied { error: String, status: StatusCode },
}

impl AuthResult {
    pub fn is_authorized(&self) -> bool {
        matches!(self, AuthResult::Authorized { .. })
    }

    /// Converts a denial into an [`AppError`] carrying the same message and
    /// status, so handlers can propagate it with `?`.
    pub fn into_result(self) -> Result<Authorized, AppError> {
        match self {
            AuthResult::Authorized { role, principal } => Ok(Authorized { role, principal }),
            AuthResult::Denied { error, status } => Err(AppError::with_message(status, error)),
        }
    }
}

pub fn authorize(principal: Option<&Principal>, requirement: Requirement) -> AuthResult {
    let Some(principal) = principal else {
        return AuthResult::Denied {
            error: UNAUTHORIZED.to_string(),
            status: StatusCode::UNAUTHORIZED,
        };
    };

    if !requirement.is_satisfied_by(principal.role) {
        tracing::debug!(
            user_id = %principal.id,
            role = %principal.role,
            requirement = requirement.label(),
            "authorization denied"
        );
        return AuthResult::Denied {
            error: requirement.forbidden_message(),
            status: StatusCode::FORBIDDEN,
        };
    }

    AuthResult::Authorized {
        role: principal.role,
        principal: principal.clone(),
    }
}

pub fn require_auth(principal: Option<&Principal>) -> AuthResult {
    authorize(principal, Requirement::Authenticated)
}

pub fn require_admin(principal: Option<&Principal>) -> AuthResult {
    authorize(principal, Requirement::Admin)
}

pub fn require_admin_or_teacher(principal: Option<&Principal>) -> AuthResult {
    authorize(principal, Requirement::AdminOrTeacher)
}

pub fn require_permission(principal: Option<&Principal>, capability: Capability) -> AuthResult {
    authorize(principal, Requirement::Capability(capability))
}

/// Like [`require_permission`] but keyed by wire name. Unknown names are
/// never granted.
pub fn require_permission_named(principal: Option<&Principal>, name: &str) -> AuthResult {
    match Capability::from_name(name) {
        Some(capability) => require_permission(principal, capability),
        None => match require_auth(principal) {
            AuthResult::Authorized { .. } => AuthResult::Denied {
                error: format!("missing permission: {}", name),
                status: StatusCode::FORBIDDEN,
            },
            denied => denied,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: Role) -> Principal {
        Principal {
            id: Uuid::new_v4(),
            email: format!("{}@uni.test", role),
            role,
            related_id: (role != Role::Admin).then(Uuid::new_v4),
        }
    }

    #[test]
    fn test_require_auth_without_session() {
        assert_eq!(
            require_auth(None),
            AuthResult::Denied {
                error: "unauthorized".to_string(),
                status: StatusCode::UNAUTHORIZED,
            }
        );
    }

    #[test]
    fn test_require_auth_with_any_role() {
        for role in Role::ALL {
            let p = principal(role);
            match require_auth(Some(&p)) {
                AuthResult::Authorized {
                    role: r,
                    principal: resolved,
                } => {
                    assert_eq!(r, role);
                    assert_eq!(resolved, p);
                }
                denied => panic!("expected authorized, got {denied:?}"),
            }
        }
    }

    #[test]
    fn test_require_admin() {
        let teacher = principal(Role::Teacher);
        match require_admin(Some(&teacher)) {
            AuthResult::Denied { error, status } => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert_eq!(error, "admin access required");
            }
            other => panic!("expected denial, got {other:?}"),
        }
        assert!(require_admin(Some(&principal(Role::Admin))).is_authorized());
        assert!(!require_admin(Some(&principal(Role::Student))).is_authorized());
    }

    #[test]
    fn test_require_admin_without_session_is_401() {
        match require_admin(None) {
            AuthResult::Denied { status, .. } => assert_eq!(status, StatusCode::UNAUTHORIZED),
            other => panic!("expected denial, got {other:?}"),
        }
    }

    #[test]
    fn test_require_admin_or_teacher() {
        assert!(require_admin_or_teacher(Some(&principal(Role::Admin))).is_authorized());
        assert!(require_admin_or_teacher(Some(&principal(Role::Teacher))).is_authorized());
        match require_admin_or_teacher(Some(&principal(Role::Student))) {
            AuthResult::Denied { status, .. } => assert_eq!(status, StatusCode::FORBIDDEN),
            other => panic!("expected denial, got {other:?}"),
        }
    }

    #[test]
    fn test_require_permission_follows_matrix() {
        for role in Role::ALL {
            let p = principal(role);
            for &capability in Capability::ALL {
                let result = require_permission(Some(&p), capability);
                assert_eq!(result.is_authorized(), role.can(capability));
            }
        }
    }

    #[test]
    fn test_require_permission_denial_message() {
        let student = principal(Role::Student);
        let err = require_permission(Some(&student), Capability::CreateStudent)
            .into_result()
            .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.public_message(), "missing permission: canCreateStudent");
    }

    #[test]
    fn test_require_permission_named() {
        let admin = principal(Role::Admin);
        assert!(require_permission_named(Some(&admin), "canDeleteCourse").is_authorized());
        assert!(!require_permission_named(Some(&admin), "canFlyPlanes").is_authorized());
        match require_permission_named(None, "canFlyPlanes") {
            AuthResult::Denied { status, .. } => assert_eq!(status, StatusCode::UNAUTHORIZED),
            other => panic!("expected denial, got {other:?}"),
        }
    }

    #[test]
    fn test_into_result_carries_principal_forward() {
        let teacher = principal(Role::Teacher);
        let auth = require_auth(Some(&teacher)).into_result().unwrap();
        assert_eq!(auth.role, Role::Teacher);
        assert_eq!(auth.user_id(), teacher.id);
        assert_eq!(auth.related_id().unwrap(), teacher.related_id.unwrap());
    }

    #[test]
    fn test_denial_is_carried_verbatim() {
        let err = require_auth(None).into_result().unwrap_err();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.public_message(), "unauthorized");
    }
}
