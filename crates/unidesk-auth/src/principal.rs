//! The authenticated actor and how it is recovered from a session token.

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use unidesk_config::JwtConfig;
use unidesk_core::{AppError, Role};

use crate::claims::SessionClaims;
use crate::jwt::verify_session_token;

/// The actor making a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Principal {
    /// Account ID
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    /// The teacher or student record the account represents; `None` for admins
    pub related_id: Option<Uuid>,
}

impl Principal {
    /// Builds a principal from verified claims. Returns `None` when the
    /// subject is not a valid account ID.
    pub fn from_claims(claims: SessionClaims) -> Option<Self> {
        let id = Uuid::parse_str(&claims.sub).ok()?;
        Some(Self {
            id,
            email: claims.email,
            role: Role::from_claim(claims.role.as_deref()),
            related_id: claims.related_id,
        })
    }

    /// The related teacher/student record, required for self-scoped queries.
    pub fn require_related_id(&self) -> Result<Uuid, AppError> {
        self.related_id
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("identity not found")))
    }
}

/// Recovers the principal behind a session token.
///
/// A missing, malformed or expired token is an ordinary outcome and yields
/// `None`; this never fails.
pub fn resolve_principal(token: Option<&str>, jwt_config: &JwtConfig) -> Option<Principal> {
    let token = token.map(str::trim).filter(|t| !t.is_empty())?;

    match verify_session_token(token, jwt_config) {
        Ok(claims) => Principal::from_claims(claims),
        Err(_) => {
            tracing::debug!("discarding invalid or expired session token");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwt::{create_session_token, encode_claims};

    fn config() -> JwtConfig {
        JwtConfig::for_tests("principal-test-secret-0123456789abcdef")
    }

    #[test]
    fn test_missing_token_is_none() {
        assert!(resolve_principal(None, &config()).is_none());
        assert!(resolve_principal(Some(""), &config()).is_none());
        assert!(resolve_principal(Some("   "), &config()).is_none());
    }

    #[test]
    fn test_invalid_token_is_none() {
        assert!(resolve_principal(Some("garbage"), &config()).is_none());
    }

    #[test]
    fn test_valid_token_resolves() {
        let config = config();
        let user_id = Uuid::new_v4();
        let teacher_id = Uuid::new_v4();
        let token =
            create_session_token(user_id, "t@uni.test", Role::Teacher, Some(teacher_id), &config)
                .unwrap();

        let principal = resolve_principal(Some(&token), &config).unwrap();
        assert_eq!(principal.id, user_id);
        assert_eq!(principal.role, Role::Teacher);
        assert_eq!(principal.related_id, Some(teacher_id));
    }

    #[test]
    fn test_token_without_role_resolves_to_student() {
        let config = config();
        let claims = SessionClaims {
            sub: Uuid::new_v4().to_string(),
            email: "legacy@uni.test".to_string(),
            role: None,
            related_id: None,
            exp: 9_999_999_999,
            iat: 0,
        };
        let token = encode_claims(&claims, &config).unwrap();

        let principal = resolve_principal(Some(&token), &config).unwrap();
        assert_eq!(principal.role, Role::Student);
    }

    #[test]
    fn test_non_uuid_subject_is_none() {
        let config = config();
        let claims = SessionClaims {
            sub: "not-a-uuid".to_string(),
            email: "x@uni.test".to_string(),
            role: Some("admin".to_string()),
            related_id: None,
            exp: 9_999_999_999,
            iat: 0,
        };
        let token = encode_claims(&claims, &config).unwrap();
        assert!(resolve_principal(Some(&token), &config).is_none());
    }

    #[test]
    fn test_require_related_id() {
        let admin = Principal {
            id: Uuid::new_v4(),
            email: "admin@uni.test".to_string(),
            role: Role::Admin,
            related_id: None,
        };
        let err = admin.require_related_id().unwrap_err();
        assert_eq!(err.status.as_u16(), 404);
        assert_eq!(err.public_message(), "identity not found");
    }
}
