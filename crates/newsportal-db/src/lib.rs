//! # News Portal DB
//!
//! User persistence for the News Portal API.
//!
//! - [`UserStore`]: the async trait the auth core depends on
//! - [`PgUserStore`]: PostgreSQL implementation on a `sqlx` pool
//! - [`InMemoryUserStore`]: in-process implementation for tests
//!
//! # Example
//!
//! ```ignore
//! use newsportal_config::DatabaseConfig;
//! use newsportal_db::{PgUserStore, init_db_pool};
//!
//! let pool = init_db_pool(&DatabaseConfig::from_env()?).await?;
//! let users = PgUserStore::new(pool);
//! ```

pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::InMemoryUserStore;
pub use postgres::PgUserStore;
pub use sqlx::PgPool;
pub use store::{StoreError, UserStore};

use newsportal_config::DatabaseConfig;
use sqlx::postgres::PgPoolOptions;

/// Opens a PostgreSQL connection pool.
///
/// Should be called once during startup; the pool is cheap to clone.
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .connect(&config.url)
        .await?;

    tracing::info!(max_connections = config.max_connections, "Database pool ready");
    Ok(pool)
}
