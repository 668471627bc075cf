//! Session token claims.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by a session token.
///
/// `role` and `related_id` are optional on the wire: tokens minted without a
/// role resolve to the least privileged role, and admin accounts have no
/// related record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Account ID (subject claim)
    pub sub: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// The teacher or student record the account represents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_id: Option<Uuid>,
    /// Expiration timestamp (Unix seconds)
    pub exp: usize,
    /// Issued-at timestamp (Unix seconds)
    pub iat: usize,
}
