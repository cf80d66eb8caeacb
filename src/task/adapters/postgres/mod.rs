//! `PostgreSQL` adapters for task assignment persistence.
//!
//! The schema lives in `migrations/`; tickets and users are read from tables
//! shared with the services that own them.

mod blocking;
mod config;
mod directory;
pub(crate) mod models;
mod schema;
pub(crate) mod store;

pub use blocking::{BlockingError, TaskPgPool};
pub use config::{DATABASE_URL_VAR, MAX_CONNECTIONS_VAR, PostgresConfigError, PostgresTaskConfig};
pub use directory::PostgresDirectory;
pub use store::PostgresTaskStore;
