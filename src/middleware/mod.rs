//! Request authentication and authorization.
//!
//! - [`auth`]: the [`auth::AuthUser`] and [`auth::BearerToken`] extractors and
//!   the [`auth::require_auth`] middleware
//! - [`role`]: role gates as middleware and helper functions
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. The token is validated by the session manager (revocation, signature,
//!    expiry, audience)
//! 3. The claims are stored in the request extensions as `AuthUser`
//! 4. Role gates compare the claim's role against the allowed set
//!
//! ```ignore
//! async fn get_profile(auth_user: AuthUser) -> Result<Json<UserProfile>, AppError> {
//!     // ...
//! }
//!
//! let admin_routes = init_admin_users_router()
//!     .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));
//! ```

pub mod auth;
pub mod role;
