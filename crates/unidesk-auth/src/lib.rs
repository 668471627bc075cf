//! # Unidesk Auth
//!
//! Session tokens, principal resolution and authorization guards for the
//! Unidesk API.
//!
//! - [`claims`]: the JWT claim structure carried by a session
//! - [`jwt`]: token creation and verification
//! - [`principal`]: turning a token into the acting [`Principal`]
//! - [`guard`]: the guard family (`require_auth`, `require_admin`,
//!   `require_admin_or_teacher`, `require_permission`)
//!
//! # Example
//!
//! ```ignore
//! use unidesk_auth::{require_permission, resolve_principal};
//! use unidesk_core::Capability;
//!
//! let principal = resolve_principal(cookie_value.as_deref(), &jwt_config);
//! let auth = require_permission(principal.as_ref(), Capability::ViewAllStudents)
//!     .into_result()?;
//! ```

pub mod claims;
pub mod guard;
pub mod jwt;
pub mod principal;

// Re-export commonly used types at crate root
pub use claims::SessionClaims;
pub use guard::{
    AuthResult, Authorized, Requirement, authorize, require_admin, require_admin_or_teacher,
    require_auth, require_permission, require_permission_named,
};
pub use jwt::{create_session_token, encode_claims, verify_session_token};
pub use principal::{Principal, resolve_principal};
