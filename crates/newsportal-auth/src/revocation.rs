//! Revoked-token registry.
//!
//! Revocation is keyed by the raw token string. Entries are kept for the
//! retention period (the refresh token lifetime) and then swept, since a
//! token older than that fails its expiry check anyway.
//!
//! The in-memory registry is process-local: a restart forgets every
//! revocation, and other instances never see it. [`RevocationStore`] is the
//! seam for a shared backend.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use newsportal_config::JwtConfig;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::clock::Clock;

#[derive(Debug, Error)]
pub enum RevocationError {
    #[error("revocation store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait RevocationStore: Send + Sync {
    /// Marks `token` as revoked. Revoking twice keeps the first timestamp.
    async fn revoke(&self, token: &str) -> Result<(), RevocationError>;

    async fn is_revoked(&self, token: &str) -> Result<bool, RevocationError>;

    /// Drops entries older than the retention period, returning how many
    /// were removed.
    async fn cleanup(&self) -> Result<usize, RevocationError>;
}

pub struct InMemoryRevocationRegistry {
    entries: RwLock<HashMap<String, DateTime<Utc>>>,
    retention: Duration,
    clock: Arc<dyn Clock>,
}

impl InMemoryRevocationRegistry {
    pub fn new(retention: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            retention,
            clock,
        }
    }

    /// Retention equal to the refresh token lifetime, saturating at
    /// [`Duration::MAX`].
    pub fn from_config(config: &JwtConfig, clock: Arc<dyn Clock>) -> Self {
        let retention =
            Duration::try_seconds(config.refresh_token_expiry).unwrap_or(Duration::MAX);
        Self::new(retention, clock)
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn revoked_at(&self, token: &str) -> Option<DateTime<Utc>> {
        self.entries.read().await.get(token).copied()
    }
}

#[async_trait]
impl RevocationStore for InMemoryRevocationRegistry {
    async fn revoke(&self, token: &str) -> Result<(), RevocationError> {
        let now = self.clock.now();
        self.entries
            .write()
            .await
            .entry(token.to_string())
            .or_insert(now);
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> Result<bool, RevocationError> {
        Ok(self.entries.read().await.contains_key(token))
    }

    async fn cleanup(&self) -> Result<usize, RevocationError> {
        let now = self.clock.now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, revoked_at| now - *revoked_at <= self.retention);
        Ok(before - entries.len())
    }
}

/// Runs [`RevocationStore::cleanup`] every `period` until the task is aborted.
///
/// Failures are logged and the loop carries on.
pub fn spawn_revocation_sweeper(
    store: Arc<dyn RevocationStore>,
    period: StdDuration,
) -> JoinHandle<()> {
    let period = period.max(StdDuration::from_secs(1));

    tokio::spawn(async move {
        tracing::info!(interval = ?period, "Revocation sweeper started");

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match store.cleanup().await {
                Ok(0) => tracing::trace!("Revocation sweep found nothing to remove"),
                Ok(removed) => tracing::debug!(removed, "Swept expired revocations"),
                Err(e) => tracing::warn!(error = %e, "Revocation sweep failed"),
            }
        }
    })
}
