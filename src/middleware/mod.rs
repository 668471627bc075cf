//! Request-time authentication and authorization.
//!
//! # Modules
//!
//! - [`auth`]: session resolution (cookie or bearer header) and the guard
//!   extractors declared with [`require!`](crate::require)
//! - [`route_guard`]: the page navigation gate for protected sections
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::{RequireAdmin, RequireAuth};
//!
//! // Any session
//! async fn list_grades(RequireAuth(auth): RequireAuth) -> impl IntoResponse { ... }
//!
//! // Admins only
//! async fn create_teacher(RequireAdmin(auth): RequireAdmin) -> impl IntoResponse { ... }
//! ```

pub mod auth;
pub mod route_guard;
