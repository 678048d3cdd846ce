//! Database connection pool and migration management.
//!
//! This module provides utilities for:
//! - Creating the shared PostgreSQL connection pool from [`Config`]
//! - Running the bundled migrations at start-up

use sqlx::{Pool, Postgres, postgres::PgPoolOptions};

use crate::config::Config;

/// Type alias for PostgreSQL connection pool.
pub type DbPool = Pool<Postgres>;

/// Create the process-wide PostgreSQL connection pool.
///
/// The pool is built once at start-up and handed to every handler through
/// axum state. Connections are opened lazily up to `DB_MAX_CONNECTIONS`
/// and closed after sitting idle for `DB_IDLE_TIMEOUT_SECS`.
///
/// # Errors
///
/// Returns an error if:
/// - The connection settings are invalid
/// - The PostgreSQL server cannot be reached or rejects the credentials
pub async fn create_pool(config: &Config) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .idle_timeout(config.idle_timeout())
        .acquire_timeout(config.acquire_timeout())
        .connect_with(config.connect_options()?)
        .await
}

/// Run database migrations from the `migrations/` directory.
///
/// Applied migrations are tracked in `_sqlx_migrations`, so each file runs
/// only once.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    // The macro embeds ./migrations at compile time
    sqlx::migrate!("./migrations").run(pool).await
}
