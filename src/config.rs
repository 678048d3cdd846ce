//! Application configuration management.
//!
//! Configuration comes from environment variables (optionally seeded from a
//! `.env` file) and is deserialized with `envy` into a type-safe struct.

use std::time::Duration;

use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (optional): full PostgreSQL URL, overrides the `DB_*` parts
/// - `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER`, `DB_PASSWORD`: connection parts
/// - `DB_MAX_CONNECTIONS`: pool size, defaults to 10
/// - `DB_IDLE_TIMEOUT_SECS`: idle connections are closed after this, defaults to 600
/// - `DB_ACQUIRE_TIMEOUT_SECS`: how long to wait for a free connection, defaults to 30
/// - `SERVER_PORT`: HTTP server port, defaults to 3000
/// - `UNIT_TIMEOUT_MS`: per unit of work timeout, defaults to 10000
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: Option<String>,

    #[serde(default = "default_db_host")]
    pub db_host: String,

    #[serde(default = "default_db_port")]
    pub db_port: u16,

    pub db_name: Option<String>,
    pub db_user: Option<String>,
    pub db_password: Option<String>,

    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,

    #[serde(default = "default_idle_timeout_secs")]
    pub db_idle_timeout_secs: u64,

    #[serde(default = "default_acquire_timeout_secs")]
    pub db_acquire_timeout_secs: u64,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default = "default_unit_timeout_ms")]
    pub unit_timeout_ms: u64,
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_max_connections() -> u32 {
    10
}

fn default_idle_timeout_secs() -> u64 {
    600
}

fn default_acquire_timeout_secs() -> u64 {
    30
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_unit_timeout_ms() -> u64 {
    10_000
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is loaded first if present.
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable cannot be parsed into
    /// its expected type.
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        // database_url -> DATABASE_URL
        envy::from_env::<Config>()
    }

    /// Build configuration from explicit `(NAME, value)` pairs.
    pub fn from_vars<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars)
    }

    /// Connection options for the pool.
    ///
    /// `DATABASE_URL` wins when set; otherwise the `DB_*` parts are used.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        if let Some(url) = &self.database_url {
            return url.parse();
        }

        let mut options = PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port);
        if let Some(name) = &self.db_name {
            options = options.database(name);
        }
        if let Some(user) = &self.db_user {
            options = options.username(user);
        }
        if let Some(password) = &self.db_password {
            options = options.password(password);
        }
        Ok(options)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.db_idle_timeout_secs)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.db_acquire_timeout_secs)
    }

    pub fn unit_timeout(&self) -> Duration {
        Duration::from_millis(self.unit_timeout_ms)
    }
}
