//! JWT issuing and validation.
//!
//! Tokens are HS256-signed with the process-wide secret from [`JwtConfig`].
//! Two kinds are issued together as a [`TokenPair`]:
//!
//! - **Access tokens** carry [`AccessClaims`] with audience `news-portal-web`
//! - **Refresh tokens** carry [`RefreshClaims`] with audience `news-portal-refresh`
//!
//! All time checks use the injected [`Clock`], never the system clock, and
//! are done here rather than by `jsonwebtoken` so expiry and not-before are
//! reported as distinct errors with zero leeway.
//!
//! # Example
//!
//! ```ignore
//! use newsportal_auth::{SystemClock, TokenIssuer, TokenValidator};
//!
//! let issuer = TokenIssuer::new(&jwt_config, clock.clone())?;
//! let pair = issuer.issue(&AuthIdentity::from(&user))?;
//!
//! let validator = TokenValidator::new(&jwt_config, revocations, clock)?;
//! let claims = validator.validate_access(&pair.access_token).await?;
//! ```

use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use newsportal_config::JwtConfig;
use newsportal_models::TokenPair;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::claims::{
    ACCESS_AUDIENCE, AccessClaims, AuthIdentity, ISSUER, REFRESH_AUDIENCE, RefreshClaims,
    RegisteredClaims,
};
use crate::clock::Clock;
use crate::error::AuthError;
use crate::revocation::RevocationStore;

pub const TOKEN_TYPE: &str = "Bearer";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn audience(&self) -> &'static str {
        match self {
            TokenKind::Access => ACCESS_AUDIENCE,
            TokenKind::Refresh => REFRESH_AUDIENCE,
        }
    }
}

fn require_secret(config: &JwtConfig) -> Result<&[u8], AuthError> {
    if config.secret.trim().is_empty() {
        return Err(AuthError::Configuration(
            "JWT secret must not be empty".to_string(),
        ));
    }
    Ok(config.secret.as_bytes())
}

/// Mints access/refresh token pairs.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    access_ttl: i64,
    refresh_ttl: i64,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    /// # Errors
    ///
    /// [`AuthError::Configuration`] if the secret is empty or blank.
    pub fn new(config: &JwtConfig, clock: Arc<dyn Clock>) -> Result<Self, AuthError> {
        let secret = require_secret(config)?;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            access_ttl: config.access_token_expiry,
            refresh_ttl: config.refresh_token_expiry,
            clock,
        })
    }

    /// Access token lifetime in seconds, as reported in `expires_in`.
    pub fn access_ttl(&self) -> i64 {
        self.access_ttl
    }

    /// Issues a new token pair for `identity`.
    ///
    /// Both tokens get `iat = nbf = now` and a fresh random `jti`. A TTL of
    /// zero yields a token that is already expired.
    ///
    /// # Errors
    ///
    /// [`AuthError::Configuration`] if an expiry overflows or signing fails.
    pub fn issue(&self, identity: &AuthIdentity) -> Result<TokenPair, AuthError> {
        let now = self.clock.now().timestamp();
        let access_exp = expires_at(now, self.access_ttl)?;
        let refresh_exp = expires_at(now, self.refresh_ttl)?;
        let sub = identity.user_id.to_string();

        let access = AccessClaims {
            user_id: identity.user_id,
            username: identity.username.clone(),
            email: identity.email.clone(),
            role: identity.role,
            sub: sub.clone(),
            iat: now,
            exp: access_exp,
            nbf: now,
            iss: ISSUER.to_string(),
            aud: ACCESS_AUDIENCE.to_string(),
            jti: Uuid::new_v4().to_string(),
        };

        let refresh = RefreshClaims {
            sub,
            iat: now,
            exp: refresh_exp,
            nbf: now,
            iss: ISSUER.to_string(),
            aud: REFRESH_AUDIENCE.to_string(),
            jti: Uuid::new_v4().to_string(),
        };

        Ok(TokenPair {
            access_token: self.sign(&access)?,
            refresh_token: self.sign(&refresh)?,
            expires_in: self.access_ttl,
            token_type: TOKEN_TYPE.to_string(),
        })
    }

    fn sign<T: serde::Serialize>(&self, claims: &T) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::Configuration(format!("Failed to create token: {}", e)))
    }
}

fn expires_at(now: i64, ttl: i64) -> Result<i64, AuthError> {
    now.checked_add(ttl).ok_or_else(|| {
        AuthError::Configuration(format!("Token lifetime of {} seconds overflows", ttl))
    })
}

/// Validates presented tokens against the revocation registry, the signing
/// secret and the clock.
pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
    revocations: Arc<dyn RevocationStore>,
    clock: Arc<dyn Clock>,
}

impl TokenValidator {
    pub fn new(
        config: &JwtConfig,
        revocations: Arc<dyn RevocationStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AuthError> {
        let secret = require_secret(config)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "nbf", "sub", "iss", "aud"]);

        Ok(Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            revocations,
            clock,
        })
    }

    /// Validates an access token and returns its identity claims.
    ///
    /// Checks run in this order, first failure wins:
    ///
    /// 1. revoked → [`AuthError::Revoked`]
    /// 2. signature, algorithm, issuer, encoding → [`AuthError::InvalidToken`]
    /// 3. `now >= exp` → [`AuthError::Expired`], `now < nbf` → [`AuthError::NotYetValid`]
    /// 4. audience is not `news-portal-web` → [`AuthError::WrongTokenType`]
    /// 5. claim shape (including the role) → [`AuthError::InvalidToken`]
    pub async fn validate_access(&self, token: &str) -> Result<AccessClaims, AuthError> {
        self.validate(token, TokenKind::Access).await
    }

    /// Same checks as [`validate_access`](Self::validate_access) with the
    /// refresh audience.
    pub async fn validate_refresh(&self, token: &str) -> Result<RefreshClaims, AuthError> {
        self.validate(token, TokenKind::Refresh).await
    }

    async fn validate<T: DeserializeOwned>(
        &self,
        token: &str,
        kind: TokenKind,
    ) -> Result<T, AuthError> {
        if self.revocations.is_revoked(token).await? {
            return Err(AuthError::Revoked);
        }

        let payload = decode::<Value>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token failed verification");
                AuthError::InvalidToken
            })?
            .claims;

        let registered: RegisteredClaims =
            serde_json::from_value(payload.clone()).map_err(|_| AuthError::InvalidToken)?;

        let now = self.clock.now().timestamp();
        if now >= registered.exp {
            return Err(AuthError::Expired);
        }
        if now < registered.nbf {
            return Err(AuthError::NotYetValid);
        }
        if registered.aud != kind.audience() {
            return Err(AuthError::WrongTokenType);
        }

        serde_json::from_value(payload).map_err(|e| {
            tracing::debug!(error = %e, "Token claims have unexpected shape");
            AuthError::InvalidToken
        })
    }
}
