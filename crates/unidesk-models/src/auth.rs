//! Authentication models: login accounts, the login exchange and `/me`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use unidesk_auth::Principal;
use unidesk_core::PermissionSet;

/// A login account as stored in `users`.
#[derive(Debug, Clone, FromRow)]
pub struct UserAccount {
    pub id: Uuid,
    pub email: String,
    /// bcrypt hash
    pub password: String,
    pub name: String,
    pub role: String,
    pub related_id: Option<Uuid>,
}

#[derive(Deserialize, Debug, ToSchema, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

/// Returned by a successful login. The token is also set as an HTTP-only
/// session cookie.
#[derive(Serialize, Debug, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub principal: Principal,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct MeResponse {
    pub principal: Principal,
    /// Every capability name mapped to whether the role holds it
    #[schema(value_type = Object)]
    pub permissions: PermissionSet,
    /// Page prefixes the role may open
    pub allowed_routes: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
