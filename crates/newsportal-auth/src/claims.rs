//! JWT claim structures.
//!
//! - [`AccessClaims`]: identity carried by access tokens
//! - [`RefreshClaims`]: registered claims only, used to mint a new pair
//!
//! Both carry a random `jti` so two tokens minted in the same second for the
//! same user are still distinct strings.

use newsportal_models::{Role, User};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const ISSUER: &str = "news-portal-api";
pub const ACCESS_AUDIENCE: &str = "news-portal-web";
pub const REFRESH_AUDIENCE: &str = "news-portal-refresh";

/// Claims embedded in an access token.
///
/// Everything the HTTP layer needs for authorization is here, so handlers
/// behind the auth middleware never hit the user store just to learn who is
/// calling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccessClaims {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    /// Stringified user id.
    pub sub: String,
    /// Issued-at (Unix seconds).
    pub iat: i64,
    /// Expiry (Unix seconds).
    pub exp: i64,
    /// Not-before (Unix seconds).
    pub nbf: i64,
    pub iss: String,
    pub aud: String,
    pub jti: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,
    pub iss: String,
    pub aud: String,
    pub jti: String,
}

impl RefreshClaims {
    /// Parses `sub` back into a user id.
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }
}

/// The subset of registered claims checked before the full claim shape is
/// decoded.
#[derive(Debug, Deserialize)]
pub(crate) struct RegisteredClaims {
    pub exp: i64,
    pub nbf: i64,
    pub aud: String,
}

/// Who a token pair is minted for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthIdentity {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
}

impl From<&User> for AuthIdentity {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}
