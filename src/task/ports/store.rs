//! Store port for task persistence and lookup.

use crate::task::domain::{Task, TaskId, TicketId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Task persistence contract.
///
/// Every task returned by a store is fully loaded: the ticket reference
/// carries its status and every user reference carries its username.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Stores a new task and returns it reloaded from storage.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::DuplicateTask`] when the task ID already
    /// exists or [`TaskStoreError::DuplicateTicketTask`] when the ticket
    /// already has a task.
    async fn create_and_reload(&self, task: &Task) -> TaskStoreResult<Task>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>>;

    /// Returns every stored task ordered by creation time.
    async fn find_all(&self) -> TaskStoreResult<Vec<Task>>;

    /// Finds the task linked to a ticket.
    ///
    /// Returns `None` when the ticket has no task.
    async fn find_by_ticket(&self, ticket_id: TicketId) -> TaskStoreResult<Option<Task>>;

    /// Persists membership changes of an existing task and returns it
    /// reloaded from storage.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn save(&self, task: &Task) -> TaskStoreResult<Task>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// A task already exists for the ticket.
    #[error("a task already exists for ticket {0}")]
    DuplicateTicketTask(TicketId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
