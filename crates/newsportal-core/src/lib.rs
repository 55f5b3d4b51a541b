//! # News Portal Core
//!
//! Foundational types shared by every crate in the workspace:
//!
//! - [`errors`]: the HTTP-facing [`AppError`] with its JSON response body
//! - [`password`]: bcrypt hashing and verification
//! - [`validation`]: flattening of `validator` errors into a single message
//!
//! # Example
//!
//! ```ignore
//! use newsportal_core::{AppError, hash_password_with_cost, verify_password};
//!
//! let hash = hash_password_with_cost("correct horse battery staple", 12)?;
//! assert!(verify_password("correct horse battery staple", &hash)?);
//!
//! let error = AppError::unauthorized("Invalid or expired token".to_string());
//! ```

pub mod errors;
pub mod password;
pub mod validation;

pub use errors::AppError;
pub use password::{hash_password_with_cost, verify_password};
pub use validation::format_errors;
