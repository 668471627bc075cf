//! # Unidesk Core
//!
//! Core types, errors, and utilities for the Unidesk API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: Pagination parameters and response metadata
//! - [`password`]: bcrypt password hashing and verification
//! - [`permissions`]: Roles, the capability matrix and the route access table
//! - [`serde`]: Custom serde deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use unidesk_core::permissions::{Capability, Role, get_permissions};
//! use unidesk_core::AppError;
//!
//! if !get_permissions(Role::Teacher).allows(Capability::DeleteCourse) {
//!     return Err(AppError::forbidden("forbidden"));
//! }
//! ```

pub mod errors;
pub mod pagination;
pub mod password;
pub mod permissions;
pub mod serde;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};
pub use password::{hash_password, verify_dummy_password, verify_password};
pub use permissions::{Capability, PermissionSet, Role};
