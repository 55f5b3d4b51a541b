//! # News Portal Auth
//!
//! Authentication core for the News Portal API.
//!
//! - [`jwt`]: [`TokenIssuer`] and [`TokenValidator`] for HS256 access/refresh tokens
//! - [`revocation`]: the [`RevocationStore`] trait, the in-memory registry and its sweeper
//! - [`credentials`]: email/password verification against the user store
//! - [`session`]: [`SessionManager`], which ties the pieces together
//! - [`roles`]: role gates on validated claims
//! - [`clock`]: injectable time source
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use newsportal_auth::{InMemoryRevocationRegistry, SessionManager, SystemClock};
//!
//! let clock = Arc::new(SystemClock);
//! let revocations = Arc::new(InMemoryRevocationRegistry::from_config(&jwt_config, clock.clone()));
//! let sessions = SessionManager::new(&jwt_config, &password_config, users, revocations, clock)?;
//!
//! let session = sessions.login("jdoe@example.com", "password123").await?;
//! let claims = sessions.authenticate(&session.tokens.access_token).await?;
//! ```

pub mod claims;
pub mod clock;
pub mod credentials;
pub mod error;
pub mod jwt;
pub mod revocation;
pub mod roles;
pub mod session;

pub use claims::{
    ACCESS_AUDIENCE, AccessClaims, AuthIdentity, ISSUER, REFRESH_AUDIENCE, RefreshClaims,
};
#[cfg(any(test, feature = "test-utils"))]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use credentials::{CredentialVerifier, normalize_email};
pub use error::AuthError;
pub use jwt::{TokenIssuer, TokenKind, TokenValidator};
pub use revocation::{
    InMemoryRevocationRegistry, RevocationError, RevocationStore, spawn_revocation_sweeper,
};
pub use roles::{check_any_role, check_role_hierarchy, require_role, role_hierarchy_level};
pub use session::{AuthSession, SessionManager};
