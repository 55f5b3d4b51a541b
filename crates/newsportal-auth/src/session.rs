//! Session lifecycle: login, registration, refresh, logout and the account
//! operations that sit next to them.
//!
//! [`SessionManager`] is the composition root of this crate. It owns the
//! token issuer, the validator, the credential verifier and handles to the
//! user and revocation stores. It is `Send + Sync` and meant to be shared in
//! an `Arc`.

use std::sync::Arc;

use newsportal_config::{JwtConfig, PasswordConfig};
use newsportal_core::{format_errors, hash_password_with_cost};
use newsportal_db::{StoreError, UserStore};
use newsportal_models::{
    NewUser, RegisterRequest, Role, TokenPair, UpdateProfileRequest, User, UserProfile,
};
use tracing::instrument;
use validator::Validate;

use crate::claims::{AccessClaims, AuthIdentity};
use crate::clock::Clock;
use crate::credentials::{CredentialVerifier, normalize_email, password_matches};
use crate::error::AuthError;
use crate::jwt::{TokenIssuer, TokenValidator};
use crate::revocation::RevocationStore;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// A freshly authenticated user and the tokens minted for them.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: UserProfile,
    pub tokens: TokenPair,
}

pub struct SessionManager {
    issuer: TokenIssuer,
    validator: TokenValidator,
    credentials: CredentialVerifier,
    users: Arc<dyn UserStore>,
    revocations: Arc<dyn RevocationStore>,
    bcrypt_cost: u32,
}

fn not_found_as_user(err: StoreError) -> AuthError {
    match err {
        StoreError::NotFound => AuthError::UserNotFound,
        other => AuthError::Store(other),
    }
}

fn duplicate_as_conflict(err: StoreError) -> AuthError {
    match err {
        StoreError::Duplicate("username") => {
            AuthError::Conflict("Username already taken".to_string())
        }
        StoreError::Duplicate(_) => AuthError::Conflict("Email already registered".to_string()),
        other => AuthError::Store(other),
    }
}

impl SessionManager {
    /// # Errors
    ///
    /// [`AuthError::Configuration`] if the JWT secret is empty or the bcrypt
    /// cost is out of range.
    pub fn new(
        jwt: &JwtConfig,
        passwords: &PasswordConfig,
        users: Arc<dyn UserStore>,
        revocations: Arc<dyn RevocationStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AuthError> {
        Ok(Self {
            issuer: TokenIssuer::new(jwt, clock.clone())?,
            validator: TokenValidator::new(jwt, revocations.clone(), clock)?,
            credentials: CredentialVerifier::new(users.clone(), passwords.bcrypt_cost)?,
            users,
            revocations,
            bcrypt_cost: passwords.bcrypt_cost,
        })
    }

    pub fn revocations(&self) -> &Arc<dyn RevocationStore> {
        &self.revocations
    }

    fn start_session(&self, user: &User) -> Result<AuthSession, AuthError> {
        Ok(AuthSession {
            tokens: self.issuer.issue(&AuthIdentity::from(user))?,
            user: UserProfile::from(user),
        })
    }

    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let user = self.credentials.verify(email, password).await?;
        let session = self.start_session(&user)?;

        tracing::info!(user_id = user.id, "User logged in");
        Ok(session)
    }

    /// Creates an account and logs it in.
    ///
    /// The email is stored trimmed and lowercased. A missing role becomes
    /// [`Role::User`].
    #[instrument(skip_all, fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthSession, AuthError> {
        request
            .validate()
            .map_err(|e| AuthError::Validation(format_errors(&e)))?;

        let email = normalize_email(&request.email);

        if self.users.email_exists(&email).await? {
            return Err(AuthError::Conflict("Email already registered".to_string()));
        }
        if self.users.username_exists(&request.username).await? {
            return Err(AuthError::Conflict("Username already taken".to_string()));
        }

        let password_hash = hash_password_with_cost(&request.password, self.bcrypt_cost)
            .map_err(|e| AuthError::Configuration(e.message()))?;

        let user = self
            .users
            .create(NewUser {
                username: request.username,
                email,
                password_hash,
                role: request.role.unwrap_or_default(),
            })
            .await
            .map_err(duplicate_as_conflict)?;

        tracing::info!(user_id = user.id, role = %user.role, "User registered");
        self.start_session(&user)
    }

    /// Exchanges a refresh token for a new pair.
    ///
    /// The user is reloaded so role changes take effect. The presented
    /// refresh token is not revoked and stays usable until it expires.
    #[instrument(skip_all)]
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.validator.validate_refresh(refresh_token).await?;
        let user_id = claims.user_id().ok_or(AuthError::InvalidToken)?;

        let user = self.users.find_by_id(user_id).await?.ok_or_else(|| {
            tracing::warn!(user_id, "Refresh token for a user that no longer exists");
            AuthError::InvalidToken
        })?;

        self.issuer.issue(&AuthIdentity::from(&user))
    }

    /// Revokes an access token.
    ///
    /// The token must itself still be valid. Only this token string is
    /// revoked; the refresh token issued alongside it keeps working.
    #[instrument(skip_all)]
    pub async fn logout(&self, access_token: &str) -> Result<(), AuthError> {
        let claims = self.validator.validate_access(access_token).await?;
        self.revocations.revoke(access_token).await?;

        tracing::info!(user_id = claims.user_id, "User logged out");
        Ok(())
    }

    pub async fn authenticate(&self, bearer_token: &str) -> Result<AccessClaims, AuthError> {
        self.validator.validate_access(bearer_token).await
    }

    /// The caller's own profile.
    pub async fn profile(&self, user_id: i64) -> Result<UserProfile, AuthError> {
        self.get_user(user_id).await
    }

    pub async fn get_user(&self, user_id: i64) -> Result<UserProfile, AuthError> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(UserProfile::from)
            .ok_or(AuthError::UserNotFound)
    }

    /// Changes the caller's username and/or email.
    ///
    /// The email is normalized. Taking another account's email or username is
    /// a [`AuthError::Conflict`]; keeping your own is not. The role never
    /// changes here, and tokens already issued keep the old username and
    /// email until they are refreshed.
    #[instrument(skip(self, request))]
    pub async fn update_profile(
        &self,
        user_id: i64,
        request: UpdateProfileRequest,
    ) -> Result<UserProfile, AuthError> {
        request
            .validate()
            .map_err(|e| AuthError::Validation(format_errors(&e)))?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let email = request
            .email
            .as_deref()
            .map(normalize_email)
            .unwrap_or_else(|| user.email.clone());
        let username = request.username.unwrap_or_else(|| user.username.clone());

        if email != user.email && self.users.email_exists(&email).await? {
            return Err(AuthError::Conflict("Email already registered".to_string()));
        }
        if username != user.username && self.users.username_exists(&username).await? {
            return Err(AuthError::Conflict("Username already taken".to_string()));
        }

        let updated = self
            .users
            .update_profile(user_id, &username, &email)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => AuthError::UserNotFound,
                other => duplicate_as_conflict(other),
            })?;

        tracing::info!(user_id, "Profile updated");
        Ok(UserProfile::from(updated))
    }

    #[instrument(skip(self, current_password, new_password))]
    pub async fn change_password(
        &self,
        user_id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if new_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::Validation(
                "password must be at least 8 characters".to_string(),
            ));
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !password_matches(&user, current_password) {
            return Err(AuthError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }

        let password_hash = hash_password_with_cost(new_password, self.bcrypt_cost)
            .map_err(|e| AuthError::Configuration(e.message()))?;
        self.users
            .update_password(user_id, &password_hash)
            .await
            .map_err(not_found_as_user)?;

        tracing::info!(user_id, "Password changed");
        Ok(())
    }

    pub async fn list_users(&self) -> Result<Vec<UserProfile>, AuthError> {
        let users = self.users.list().await?;
        Ok(users.into_iter().map(UserProfile::from).collect())
    }

    /// Takes effect for the user's next refresh; tokens already issued keep
    /// the old role until they expire.
    #[instrument(skip(self))]
    pub async fn update_role(&self, user_id: i64, role: Role) -> Result<UserProfile, AuthError> {
        let user = self
            .users
            .update_role(user_id, role)
            .await
            .map_err(not_found_as_user)?;

        tracing::info!(user_id, role = %role, "User role updated");
        Ok(UserProfile::from(user))
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, actor_id: i64, user_id: i64) -> Result<(), AuthError> {
        if actor_id == user_id {
            return Err(AuthError::Validation(
                "You cannot delete your own account".to_string(),
            ));
        }

        self.users
            .delete(user_id)
            .await
            .map_err(not_found_as_user)?;

        tracing::info!(user_id, "User deleted");
        Ok(())
    }
}
