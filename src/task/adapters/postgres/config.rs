//! Connection settings for the `PostgreSQL` adapters.

use super::blocking::TaskPgPool;
use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use serde::Deserialize;
use thiserror::Error;

/// Environment variable holding the database URL.
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Environment variable holding the optional pool size.
pub const MAX_CONNECTIONS_VAR: &str = "TASK_DB_MAX_CONNECTIONS";

const DEFAULT_MAX_CONNECTIONS: u32 = 8;

/// Settings used to build the shared connection pool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PostgresTaskConfig {
    /// `PostgreSQL` connection URL.
    pub database_url: String,
    /// Upper bound on pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

const fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

/// Errors raised while loading settings or building the pool.
#[derive(Debug, Error)]
pub enum PostgresConfigError {
    /// A required variable is not set.
    #[error("missing required setting {0}")]
    Missing(&'static str),

    /// A variable holds a value that cannot be used.
    #[error("invalid value '{value}' for setting {name}")]
    Invalid {
        /// Setting name.
        name: &'static str,
        /// Rejected value.
        value: String,
    },

    /// The pool could not be built.
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] PoolError),
}

impl PostgresTaskConfig {
    /// Creates settings for `database_url` with the default pool size.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
        }
    }

    /// Sets the pool size.
    #[must_use]
    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Reads settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`PostgresConfigError`] when `DATABASE_URL` is unset or the
    /// pool size is not a positive integer.
    pub fn from_env() -> Result<Self, PostgresConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`, which maps variable names to values.
    ///
    /// # Errors
    ///
    /// Returns [`PostgresConfigError`] when the database URL is missing or
    /// blank, or the pool size is not a positive integer.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, PostgresConfigError> {
        let database_url = lookup(DATABASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .ok_or(PostgresConfigError::Missing(DATABASE_URL_VAR))?;

        let config = Self::new(database_url);
        match lookup(MAX_CONNECTIONS_VAR) {
            None => Ok(config),
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(max_connections) if max_connections > 0 => {
                    Ok(config.with_max_connections(max_connections))
                }
                _ => Err(PostgresConfigError::Invalid {
                    name: MAX_CONNECTIONS_VAR,
                    value: raw,
                }),
            },
        }
    }

    /// Builds the connection pool shared by the task adapters.
    ///
    /// # Errors
    ///
    /// Returns [`PostgresConfigError::Pool`] when the pool cannot establish
    /// its initial connections.
    pub fn build_pool(&self) -> Result<TaskPgPool, PostgresConfigError> {
        let manager = ConnectionManager::<PgConnection>::new(&self.database_url);
        Ok(Pool::builder()
            .max_size(self.max_connections)
            .build(manager)?)
    }
}
