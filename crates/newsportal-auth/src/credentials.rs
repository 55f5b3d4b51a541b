use std::sync::Arc;

use newsportal_core::{AppError, hash_password_with_cost, verify_password};
use newsportal_db::UserStore;
use newsportal_models::User;

use crate::error::AuthError;

/// Hashed once per verifier and checked against when the email is unknown.
const DUMMY_PASSWORD: &str = "newsportal-dummy-password";

/// Trims and lowercases an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Checks email/password pairs against the user store.
///
/// An unknown email and a wrong password are indistinguishable to the
/// caller: both return [`AuthError::InvalidCredentials`], and both cost one
/// bcrypt verification at the configured cost.
pub struct CredentialVerifier {
    users: Arc<dyn UserStore>,
    dummy_hash: String,
}

impl CredentialVerifier {
    /// # Errors
    ///
    /// [`AuthError::Configuration`] if `bcrypt_cost` is outside 4 through 31.
    pub fn new(users: Arc<dyn UserStore>, bcrypt_cost: u32) -> Result<Self, AuthError> {
        let dummy_hash = hash_password_with_cost(DUMMY_PASSWORD, bcrypt_cost)
            .map_err(|e| AuthError::Configuration(e.message()))?;

        Ok(Self { users, dummy_hash })
    }

    pub async fn verify(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let user = match self.users.find_by_email(&normalize_email(email)).await? {
            Some(user) => user,
            None => {
                hash_matches(password, &self.dummy_hash);
                return Err(AuthError::InvalidCredentials);
            }
        };

        if password_matches(&user, password) {
            Ok(user)
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
thread_local! {
    static VERIFICATIONS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

fn check_hash(password: &str, hash: &str) -> Result<bool, AppError> {
    #[cfg(test)]
    VERIFICATIONS.with(|count| count.set(count.get() + 1));

    verify_password(password, hash)
}

fn hash_matches(password: &str, hash: &str) -> bool {
    check_hash(password, hash).unwrap_or(false)
}

/// A stored hash bcrypt cannot parse counts as a mismatch.
pub(crate) fn password_matches(user: &User, password: &str) -> bool {
    match check_hash(password, &user.password_hash) {
        Ok(matches) => matches,
        Err(e) => {
            tracing::warn!(user_id = user.id, error = %e, "Stored password hash is malformed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use newsportal_db::InMemoryUserStore;
    use newsportal_models::{NewUser, Role};

    async fn store_with(email: &str, password_hash: String) -> Arc<InMemoryUserStore> {
        let store = Arc::new(InMemoryUserStore::new());
        store
            .create(NewUser {
                username: "jdoe".to_string(),
                email: email.to_string(),
                password_hash,
                role: Role::User,
            })
            .await
            .unwrap();
        store
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  JDoe@Example.COM "), "jdoe@example.com");
    }

    #[tokio::test]
    async fn test_verify_accepts_correct_password() {
        let hash = hash_password_with_cost("password123", 4).unwrap();
        let verifier =
            CredentialVerifier::new(store_with("jdoe@example.com", hash).await, 4).unwrap();

        let user = verifier.verify(" JDOE@example.com", "password123").await.unwrap();
        assert_eq!(user.username, "jdoe");
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email_look_the_same() {
        let hash = hash_password_with_cost("password123", 4).unwrap();
        let verifier =
            CredentialVerifier::new(store_with("jdoe@example.com", hash).await, 4).unwrap();

        let wrong_password = verifier
            .verify("jdoe@example.com", "wrong-password")
            .await
            .unwrap_err();
        let unknown_email = verifier
            .verify("nobody@example.com", "password123")
            .await
            .unwrap_err();

        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
        assert!(matches!(unknown_email, AuthError::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_malformed_hash_is_a_mismatch() {
        let verifier = CredentialVerifier::new(
            store_with("jdoe@example.com", "not-a-bcrypt-hash".to_string()).await,
            4,
        )
        .unwrap();

        assert!(matches!(
            verifier.verify("jdoe@example.com", "password123").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    fn verifications() -> usize {
        VERIFICATIONS.with(|count| count.get())
    }

    #[tokio::test]
    async fn test_unknown_email_costs_one_verification() {
        let hash = hash_password_with_cost("password123", 4).unwrap();
        let verifier =
            CredentialVerifier::new(store_with("jdoe@example.com", hash).await, 4).unwrap();

        let before = verifications();
        let _ = verifier.verify("jdoe@example.com", "wrong-password").await;
        let wrong_password = verifications() - before;

        let before = verifications();
        let _ = verifier.verify("nobody@example.com", "password123").await;
        let unknown_email = verifications() - before;

        assert_eq!(wrong_password, 1);
        assert_eq!(unknown_email, 1);
    }

    #[test]
    fn test_invalid_cost_is_configuration_error() {
        let users: Arc<dyn UserStore> = Arc::new(InMemoryUserStore::new());
        assert!(matches!(
            CredentialVerifier::new(users, 3),
            Err(AuthError::Configuration(_))
        ));
    }
}
