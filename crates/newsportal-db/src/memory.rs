//! In-process [`UserStore`] used by tests and local development.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use newsportal_models::{NewUser, Role, User};
use tokio::sync::RwLock;

use crate::store::{StoreError, UserStore};

#[derive(Default)]
struct Inner {
    users: BTreeMap<i64, User>,
    next_id: i64,
}

/// Users kept in a `BTreeMap` behind a `tokio` lock, mirroring the
/// uniqueness rules of the `users` table.
#[derive(Default)]
pub struct InMemoryUserStore {
    inner: RwLock<Inner>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

fn same_email(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .values()
            .find(|user| same_email(&user.email, email))
            .cloned())
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    async fn username_exists(&self, username: &str) -> Result<bool, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().any(|user| user.username == username))
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;

        if inner.users.values().any(|u| same_email(&u.email, &user.email)) {
            return Err(StoreError::Duplicate("email"));
        }
        if inner.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate("username"));
        }

        inner.next_id += 1;
        let now = Utc::now();
        let created = User {
            id: inner.next_id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.inner.read().await.users.values().cloned().collect())
    }

    async fn update_password(&self, id: i64, password_hash: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let user = inner.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.password_hash = password_hash.to_string();
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn update_role(&self, id: i64, role: Role) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        let user = inner.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.role = role;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn update_profile(
        &self,
        id: i64,
        username: &str,
        email: &str,
    ) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;

        if !inner.users.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        for other in inner.users.values().filter(|u| u.id != id) {
            if same_email(&other.email, email) {
                return Err(StoreError::Duplicate("email"));
            }
            if other.username == username {
                return Err(StoreError::Duplicate("username"));
            }
        }

        let user = inner.users.get_mut(&id).ok_or(StoreError::NotFound)?;
        user.username = username.to_string();
        user.email = email.to_string();
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}
