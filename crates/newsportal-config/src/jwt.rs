use std::env;

use crate::{ConfigError, env_or};

/// One hour.
pub const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 3600;
/// Seven days.
pub const DEFAULT_REFRESH_TOKEN_EXPIRY: i64 = 604_800;
/// Ten years. Longer lifetimes are rejected by [`JwtConfig::validate`].
pub const MAX_TOKEN_EXPIRY: i64 = 315_360_000;

/// JWT signing configuration.
///
/// Expiry values are in seconds. The refresh expiry doubles as the retention
/// period of the revocation registry: once a revoked token is older than the
/// longest token lifetime it can no longer pass expiry checks anyway.
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry: i64,
    pub refresh_token_expiry: i64,
}

impl JwtConfig {
    /// Builds a config with the default lifetimes.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            access_token_expiry: DEFAULT_ACCESS_TOKEN_EXPIRY,
            refresh_token_expiry: DEFAULT_REFRESH_TOKEN_EXPIRY,
        }
    }

    /// Reads `JWT_SECRET`, `JWT_ACCESS_EXPIRY` and `JWT_REFRESH_EXPIRY`.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingSecret`] when `JWT_SECRET` is unset or blank
    /// - [`ConfigError::Invalid`] for unparseable lifetimes or ones above
    ///   [`MAX_TOKEN_EXPIRY`]
    /// - [`ConfigError::Negative`] for negative lifetimes
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = require_secret(env::var("JWT_SECRET").ok())?;

        let config = Self {
            secret,
            access_token_expiry: env_or("JWT_ACCESS_EXPIRY", DEFAULT_ACCESS_TOKEN_EXPIRY)?,
            refresh_token_expiry: env_or("JWT_REFRESH_EXPIRY", DEFAULT_REFRESH_TOKEN_EXPIRY)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        check_expiry("JWT_ACCESS_EXPIRY", self.access_token_expiry)?;
        check_expiry("JWT_REFRESH_EXPIRY", self.refresh_token_expiry)
    }
}

fn check_expiry(key: &'static str, seconds: i64) -> Result<(), ConfigError> {
    if seconds < 0 {
        return Err(ConfigError::Negative { key });
    }
    if seconds > MAX_TOKEN_EXPIRY {
        return Err(ConfigError::Invalid {
            key,
            value: seconds.to_string(),
        });
    }
    Ok(())
}

fn require_secret(raw: Option<String>) -> Result<String, ConfigError> {
    match raw {
        Some(secret) if !secret.trim().is_empty() => Ok(secret),
        _ => Err(ConfigError::MissingSecret),
    }
}
