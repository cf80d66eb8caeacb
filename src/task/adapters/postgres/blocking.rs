//! Blocking operation helpers for the `PostgreSQL` adapters.
//!
//! Diesel connections are synchronous, so every adapter call checks out a
//! pooled connection on tokio's blocking thread pool.

use diesel::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use thiserror::Error;
use tokio::task::JoinError;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Failure outside the caller's closure.
#[derive(Debug, Error)]
pub enum BlockingError {
    /// No connection could be checked out of the pool.
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),
    /// The blocking task panicked or was cancelled.
    #[error("blocking task failed: {0}")]
    Join(#[from] JoinError),
}

/// Runs `f` with a pooled connection on the blocking thread pool.
///
/// Pool and join failures are mapped into the caller's error type with
/// `map_err`.
pub(super) async fn run_blocking_with<F, T, E, M>(
    pool: &TaskPgPool,
    f: F,
    map_err: M,
) -> Result<T, E>
where
    F: FnOnce(&mut PgConnection) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    M: Fn(BlockingError) -> E + Copy + Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool
            .get()
            .map_err(|err| map_err(BlockingError::Pool(err)))?;
        f(&mut connection)
    })
    .await
    .map_err(|err| map_err(BlockingError::Join(err)))?
}
