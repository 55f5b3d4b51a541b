use anyhow::anyhow;
use newsportal_core::AppError;
use newsportal_db::StoreError;
use thiserror::Error;

use crate::revocation::RevocationError;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("auth configuration error: {0}")]
    Configuration(String),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("missing authorization header")]
    MissingToken,

    #[error("invalid authorization header format")]
    MalformedHeader,

    #[error("token has been revoked")]
    Revoked,

    #[error("invalid token")]
    InvalidToken,

    #[error("token has expired")]
    Expired,

    #[error("token is not valid yet")]
    NotYetValid,

    #[error("wrong token type")]
    WrongTokenType,

    #[error("user not found")]
    UserNotFound,

    #[error("insufficient permissions")]
    Forbidden,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Revocation(#[from] RevocationError),
}

impl AuthError {
    /// True for every rejection of a presented token.
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            AuthError::Revoked
                | AuthError::InvalidToken
                | AuthError::Expired
                | AuthError::NotYetValid
                | AuthError::WrongTokenType
        )
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        if err.is_token_rejection() {
            tracing::debug!(reason = %err, "Token rejected");
            return AppError::unauthorized("Invalid or expired token".to_string());
        }

        match err {
            AuthError::InvalidCredentials => {
                AppError::unauthorized("Invalid email or password".to_string())
            }
            AuthError::MissingToken => {
                AppError::unauthorized("Missing authorization header".to_string())
            }
            AuthError::MalformedHeader => {
                AppError::unauthorized("Invalid authorization header format".to_string())
            }
            AuthError::Forbidden => AppError::forbidden("Insufficient permissions".to_string()),
            AuthError::UserNotFound => AppError::not_found(anyhow!("User not found")),
            AuthError::Validation(msg) => AppError::bad_request(anyhow::Error::msg(msg)),
            AuthError::Conflict(msg) => AppError::conflict(msg),
            AuthError::Store(e) => e.into(),
            AuthError::Configuration(msg) => {
                tracing::error!(error = %msg, "Auth configuration error");
                AppError::internal_error("Internal server error".to_string())
            }
            AuthError::Revocation(e) => {
                tracing::error!(error = %e, "Revocation store error");
                AppError::internal_error("Internal server error".to_string())
            }
            _ => AppError::unauthorized("Invalid or expired token".to_string()),
        }
    }
}
