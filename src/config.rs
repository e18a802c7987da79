//! Configuration for the `PostgreSQL` board store.
//!
//! # Examples
//!
//! ```
//! use std::time::Duration;
//! use taskboard::config::StoreConfig;
//!
//! let config = StoreConfig::new("postgres://localhost/board")
//!     .with_max_pool_size(4)
//!     .with_connection_timeout(Duration::from_secs(5));
//! assert_eq!(config.max_pool_size(), 4);
//! ```

use crate::board::adapters::postgres::{
    BoardPgPool, DEFAULT_BOARD_LOCK_KEY, PostgresBoardRepository,
};
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the database URL.
pub const DATABASE_URL_VAR: &str = "TASKBOARD_DATABASE_URL";
/// Environment variable holding the maximum pool size.
pub const POOL_SIZE_VAR: &str = "TASKBOARD_POOL_SIZE";
/// Environment variable holding the connection timeout in seconds.
pub const CONNECT_TIMEOUT_VAR: &str = "TASKBOARD_CONNECT_TIMEOUT_SECS";

/// Errors raised while loading configuration or building the pool.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No database URL was supplied.
    #[error("missing required setting {0}")]
    Missing(&'static str),

    /// A setting could not be parsed.
    #[error("invalid value '{value}' for {key}")]
    Invalid {
        /// Setting name.
        key: &'static str,
        /// Rejected raw value.
        value: String,
    },

    /// The connection pool could not be built.
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] PoolError),
}

/// Settings for connecting the board to `PostgreSQL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    database_url: String,
    max_pool_size: u32,
    connection_timeout: Duration,
    lock_key: i64,
}

impl StoreConfig {
    /// Pool size used when none is configured.
    pub const DEFAULT_MAX_POOL_SIZE: u32 = 8;
    /// Connection timeout used when none is configured.
    pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a configuration with default pool settings.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_pool_size: Self::DEFAULT_MAX_POOL_SIZE,
            connection_timeout: Self::DEFAULT_CONNECTION_TIMEOUT,
            lock_key: DEFAULT_BOARD_LOCK_KEY,
        }
    }

    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when [`DATABASE_URL_VAR`] is unset and
    /// [`ConfigError::Invalid`] when an optional setting does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup(DATABASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing(DATABASE_URL_VAR))?;
        let mut config = Self::new(database_url);

        if let Some(raw) = lookup(POOL_SIZE_VAR) {
            let size = parse_setting::<u32>(POOL_SIZE_VAR, &raw)?;
            if size == 0 {
                return Err(ConfigError::Invalid {
                    key: POOL_SIZE_VAR,
                    value: raw,
                });
            }
            config.max_pool_size = size;
        }
        if let Some(raw) = lookup(CONNECT_TIMEOUT_VAR) {
            config.connection_timeout =
                Duration::from_secs(parse_setting::<u64>(CONNECT_TIMEOUT_VAR, &raw)?);
        }
        Ok(config)
    }

    /// Sets the maximum number of pooled connections.
    #[must_use]
    pub const fn with_max_pool_size(mut self, max_pool_size: u32) -> Self {
        self.max_pool_size = max_pool_size;
        self
    }

    /// Sets how long to wait for a pooled connection.
    #[must_use]
    pub const fn with_connection_timeout(mut self, connection_timeout: Duration) -> Self {
        self.connection_timeout = connection_timeout;
        self
    }

    /// Sets the advisory lock key serializing board writers.
    #[must_use]
    pub const fn with_lock_key(mut self, lock_key: i64) -> Self {
        self.lock_key = lock_key;
        self
    }

    /// Returns the database URL.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    /// Returns the maximum pool size.
    #[must_use]
    pub const fn max_pool_size(&self) -> u32 {
        self.max_pool_size
    }

    /// Returns the connection timeout.
    #[must_use]
    pub const fn connection_timeout(&self) -> Duration {
        self.connection_timeout
    }

    /// Returns the advisory lock key.
    #[must_use]
    pub const fn lock_key(&self) -> i64 {
        self.lock_key
    }

    /// Builds a connection pool from these settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Pool`] when the pool cannot establish its
    /// initial connections.
    pub fn build_pool(&self) -> Result<BoardPgPool, ConfigError> {
        let manager = ConnectionManager::<PgConnection>::new(self.database_url.as_str());
        let pool = Pool::builder()
            .max_size(self.max_pool_size)
            .connection_timeout(self.connection_timeout)
            .build(manager)?;
        Ok(pool)
    }

    /// Builds the pool and wraps it in a repository that serializes writers
    /// on the configured advisory lock key.
    ///
    /// # Errors
    ///
    /// Same as [`Self::build_pool`].
    pub fn connect(&self) -> Result<PostgresBoardRepository, ConfigError> {
        Ok(PostgresBoardRepository::new(self.build_pool()?).with_lock_key(self.lock_key))
    }
}

fn parse_setting<T: std::str::FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: raw.to_owned(),
    })
}
