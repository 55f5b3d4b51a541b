use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use newsportal::logging::init_tracing;
use newsportal::router::init_router;
use newsportal::state::AppState;
use newsportal_auth::{
    Clock, InMemoryRevocationRegistry, RevocationStore, SessionManager, SystemClock,
    spawn_revocation_sweeper,
};
use newsportal_config::{DatabaseConfig, JwtConfig, PasswordConfig, ServerConfig};
use newsportal_db::{PgUserStore, UserStore, init_db_pool};
use tower_http::timeout::TimeoutLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let _log_guards = init_tracing().context("Failed to initialize logging")?;

    if let Err(e) = run().await {
        tracing::error!("Server exited with an error: {:#}", e);
        return Err(e);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    let jwt_config = JwtConfig::from_env()?;
    let password_config = PasswordConfig::from_env()?;
    let database_config = DatabaseConfig::from_env()?;
    let server_config = ServerConfig::from_env()?;

    let pool = init_db_pool(&database_config)
        .await
        .context("Failed to connect to database")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let users: Arc<dyn UserStore> = Arc::new(PgUserStore::new(pool));
    let revocations: Arc<dyn RevocationStore> = Arc::new(InMemoryRevocationRegistry::from_config(
        &jwt_config,
        clock.clone(),
    ));

    let sessions = SessionManager::new(
        &jwt_config,
        &password_config,
        users,
        revocations.clone(),
        clock,
    )?;
    let sweeper = spawn_revocation_sweeper(revocations, server_config.revocation_sweep_interval);

    let app = init_router(AppState::new(sessions))
        .layer(TimeoutLayer::new(server_config.request_timeout));

    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    sweeper.abort();
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
