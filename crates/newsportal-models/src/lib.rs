//! # News Portal Models
//!
//! Domain models and DTOs for the News Portal API.
//!
//! # Modules
//!
//! - [`auth`]: login, registration, token and password-change payloads
//! - [`users`]: the user entity, its public profile and the [`Role`] enum
//!
//! # Example
//!
//! ```ignore
//! use newsportal_models::{Role, User, UserProfile};
//!
//! let profile = UserProfile::from(&user);
//! assert!(Role::Admin.is_admin());
//! ```

pub mod auth;
pub mod users;

pub use auth::{
    AuthResponse, ChangePasswordRequest, LoginRequest, MessageResponse, RefreshTokenRequest,
    RegisterRequest, TokenPair, UpdateProfileRequest, UpdateRoleRequest,
};
pub use users::{NewUser, Role, User, UserProfile};
