//! Session token issue and verification.
//!
//! Tokens are HS256 JWTs signed with [`JwtConfig::secret`]. They are issued
//! by the login endpoint and carried either in the session cookie or in an
//! `Authorization: Bearer` header.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use unidesk_config::JwtConfig;
use unidesk_core::{AppError, Role};

use crate::claims::SessionClaims;

/// Creates a signed session token for an account.
pub fn create_session_token(
    user_id: Uuid,
    email: &str,
    role: Role,
    related_id: Option<Uuid>,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;

    let claims = SessionClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role: Some(role.as_str().to_string()),
        related_id,
        exp: now + jwt_config.session_expiry as usize,
        iat: now,
    };

    encode_claims(&claims, jwt_config)
}

pub fn encode_claims(claims: &SessionClaims, jwt_config: &JwtConfig) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create session token: {}", e)))
}

/// Verifies signature and expiry and returns the claims.
pub fn verify_session_token(token: &str, jwt_config: &JwtConfig) -> Result<SessionClaims, AppError> {
    decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired session"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig::for_tests("test-secret-key-at-least-32-characters-long")
    }

    #[test]
    fn test_round_trip_keeps_role_and_related_id() {
        let config = config();
        let user_id = Uuid::new_v4();
        let student_id = Uuid::new_v4();

        let token =
            create_session_token(user_id, "s1@uni.test", Role::Student, Some(student_id), &config)
                .unwrap();
        let claims = verify_session_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role.as_deref(), Some("student"));
        assert_eq!(claims.related_id, Some(student_id));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token =
            create_session_token(Uuid::new_v4(), "a@uni.test", Role::Admin, None, &config())
                .unwrap();
        let other = JwtConfig::for_tests("a-completely-different-secret-value");
        let err = verify_session_token(&token, &other).unwrap_err();
        assert_eq!(err.status.as_u16(), 401);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let config = config();
        let claims = SessionClaims {
            sub: Uuid::new_v4().to_string(),
            email: "old@uni.test".to_string(),
            role: Some("admin".to_string()),
            related_id: None,
            exp: 1_000,
            iat: 900,
        };
        let token = encode_claims(&claims, &config).unwrap();
        assert!(verify_session_token(&token, &config).is_err());
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(verify_session_token("not.a.token", &config()).is_err());
    }
}
