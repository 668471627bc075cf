use std::env;

use crate::env_or;

pub const DEFAULT_SESSION_COOKIE: &str = "unidesk_session";

/// Settings for signing and transporting session tokens.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Session lifetime in seconds.
    pub session_expiry: i64,
    /// Name of the cookie that carries the session token.
    pub cookie_name: String,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string()),
            session_expiry: env_or("JWT_SESSION_EXPIRY", 86400), // 24 hours
            cookie_name: env::var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|_| DEFAULT_SESSION_COOKIE.to_string()),
        }
    }

    /// A fixed configuration for tests.
    pub fn for_tests(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
            session_expiry: 3600,
            cookie_name: DEFAULT_SESSION_COOKIE.to_string(),
        }
    }
}
