//! # News Portal Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: signing secret and token lifetimes
//! - [`password`]: bcrypt cost
//! - [`database`]: PostgreSQL connection settings
//! - [`server`]: bind address, request timeout and revocation sweep interval
//!
//! Every `from_env` constructor returns a [`ConfigError`] instead of silently
//! falling back when a value is present but unusable. A missing `JWT_SECRET`
//! is an error; the remaining values have defaults.
//!
//! # Example
//!
//! ```ignore
//! use newsportal_config::{JwtConfig, ServerConfig};
//!
//! let jwt_config = JwtConfig::from_env()?;
//! let server_config = ServerConfig::from_env()?;
//! ```

pub mod database;
pub mod error;
pub mod jwt;
pub mod password;
pub mod server;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use jwt::JwtConfig;
pub use password::PasswordConfig;
pub use server::ServerConfig;

use std::str::FromStr;

/// Reads `key` from the environment and parses it, using `default` when unset.
pub(crate) fn env_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    parse_var(key, std::env::var(key).ok(), default)
}

pub(crate) fn parse_var<T: FromStr>(
    key: &'static str,
    raw: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) if value.trim().is_empty() => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_uses_default_when_unset() {
        assert_eq!(parse_var("PORT", None, 3000u16).unwrap(), 3000);
        assert_eq!(parse_var("PORT", Some("  ".into()), 3000u16).unwrap(), 3000);
    }

    #[test]
    fn test_parse_var_parses_value() {
        assert_eq!(parse_var("PORT", Some(" 8080 ".into()), 3000u16).unwrap(), 8080);
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        let err = parse_var("PORT", Some("eighty".into()), 3000u16).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }
}
