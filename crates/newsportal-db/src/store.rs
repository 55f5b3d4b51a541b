use anyhow::anyhow;
use async_trait::async_trait;
use newsportal_core::AppError;
use newsportal_models::{NewUser, Role, User};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("user not found")]
    NotFound,

    /// A unique constraint was violated; carries the offending field.
    #[error("{0} already exists")]
    Duplicate(&'static str),

    /// A stored row could not be turned into a valid [`User`].
    #[error("corrupt user record: {0}")]
    Integrity(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::not_found(anyhow!("User not found")),
            StoreError::Duplicate("email") => {
                AppError::conflict("Email already registered".to_string())
            }
            StoreError::Duplicate("username") => {
                AppError::conflict("Username already taken".to_string())
            }
            StoreError::Duplicate(field) => AppError::conflict(format!("{field} already exists")),
            StoreError::Integrity(message) => {
                tracing::error!(error = %message, "User record failed integrity check");
                AppError::internal_error("Internal server error".to_string())
            }
            StoreError::Database(e) => {
                tracing::error!(error = %e, "User store query failed");
                AppError::internal_error("Internal server error".to_string())
            }
        }
    }
}

/// Persistence for user accounts.
///
/// Email lookups are case-insensitive. Callers pass normalized (trimmed,
/// lowercased) emails to [`UserStore::create`].
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError>;

    async fn username_exists(&self, username: &str) -> Result<bool, StoreError>;

    /// Inserts a user. A concurrent insert that wins the race surfaces as
    /// [`StoreError::Duplicate`].
    async fn create(&self, user: NewUser) -> Result<User, StoreError>;

    /// All users ordered by id.
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), StoreError>;

    async fn update_role(&self, id: i64, role: Role) -> Result<User, StoreError>;

    /// Replaces username and email. Taking another user's email or username
    /// is [`StoreError::Duplicate`].
    async fn update_profile(&self, id: i64, username: &str, email: &str)
    -> Result<User, StoreError>;

    async fn delete(&self, id: i64) -> Result<(), StoreError>;
}
