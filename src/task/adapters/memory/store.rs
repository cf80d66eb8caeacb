//! In-memory task store for tests and embedding.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::InMemoryDirectory;
use crate::task::{
    domain::{PersistedTaskData, Task, TaskId, TicketId, UserId},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};

/// Thread-safe in-memory task store.
///
/// Only associations are kept here. Ticket statuses and usernames are read
/// from the shared [`InMemoryDirectory`] whenever a task is loaded, the way a
/// relational store joins them in.
#[derive(Debug, Clone)]
pub struct InMemoryTaskStore {
    directory: InMemoryDirectory,
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, StoredTask>,
    ticket_index: HashMap<TicketId, TaskId>,
}

#[derive(Debug, Clone)]
struct StoredTask {
    ticket_id: TicketId,
    user_ids: Vec<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StoredTask {
    fn from_task(task: &Task) -> Self {
        Self {
            ticket_id: task.ticket().id(),
            user_ids: task.user_ids(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

impl InMemoryTaskStore {
    /// Creates an empty store that loads references from `directory`.
    #[must_use]
    pub fn new(directory: InMemoryDirectory) -> Self {
        Self {
            directory,
            state: Arc::new(RwLock::new(InMemoryTaskState::default())),
        }
    }

    /// Joins stored associations with directory records.
    fn load(&self, id: TaskId, stored: &StoredTask) -> TaskStoreResult<Task> {
        let ticket = self
            .directory
            .load_ticket(stored.ticket_id)
            .map_err(TaskStoreError::persistence)?
            .ok_or_else(|| dangling_reference(format!("ticket {}", stored.ticket_id)))?;

        let users = stored
            .user_ids
            .iter()
            .map(|user_id| {
                self.directory
                    .load_user(*user_id)
                    .map_err(TaskStoreError::persistence)?
                    .ok_or_else(|| dangling_reference(format!("user {user_id}")))
            })
            .collect::<TaskStoreResult<Vec<_>>>()?;

        Ok(Task::from_persisted(PersistedTaskData {
            id,
            ticket,
            users,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }))
    }
}

fn lock_error(err: impl ToString) -> TaskStoreError {
    TaskStoreError::persistence(std::io::Error::other(err.to_string()))
}

fn dangling_reference(what: String) -> TaskStoreError {
    TaskStoreError::persistence(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        format!("referenced {what} does not exist"),
    ))
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create_and_reload(&self, task: &Task) -> TaskStoreResult<Task> {
        let mut state = self.state.write().map_err(lock_error)?;
        if state.tasks.contains_key(&task.id()) {
            return Err(TaskStoreError::DuplicateTask(task.id()));
        }

        let ticket_id = task.ticket().id();
        if state.ticket_index.contains_key(&ticket_id) {
            return Err(TaskStoreError::DuplicateTicketTask(ticket_id));
        }

        let stored = StoredTask::from_task(task);
        // Loading before insertion rejects dangling references like a
        // foreign key would.
        let reloaded = self.load(task.id(), &stored)?;
        state.ticket_index.insert(ticket_id, task.id());
        state.tasks.insert(task.id(), stored);
        Ok(reloaded)
    }

    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        state
            .tasks
            .get(&id)
            .map(|stored| self.load(id, stored))
            .transpose()
    }

    async fn find_all(&self) -> TaskStoreResult<Vec<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        let mut entries: Vec<(&TaskId, &StoredTask)> = state.tasks.iter().collect();
        entries.sort_by(|(left_id, left), (right_id, right)| {
            left.created_at
                .cmp(&right.created_at)
                .then_with(|| left_id.cmp(right_id))
        });
        entries
            .into_iter()
            .map(|(id, stored)| self.load(*id, stored))
            .collect()
    }

    async fn find_by_ticket(&self, ticket_id: TicketId) -> TaskStoreResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        state
            .ticket_index
            .get(&ticket_id)
            .and_then(|task_id| state.tasks.get(task_id).map(|stored| (*task_id, stored)))
            .map(|(task_id, stored)| self.load(task_id, stored))
            .transpose()
    }

    async fn save(&self, task: &Task) -> TaskStoreResult<Task> {
        let mut state = self.state.write().map_err(lock_error)?;
        let existing = state
            .tasks
            .get(&task.id())
            .ok_or(TaskStoreError::NotFound(task.id()))?;

        // The ticket link and creation time are fixed once stored.
        let stored = StoredTask {
            ticket_id: existing.ticket_id,
            user_ids: task.user_ids(),
            created_at: existing.created_at,
            updated_at: task.updated_at(),
        };
        let reloaded = self.load(task.id(), &stored)?;
        state.tasks.insert(task.id(), stored);
        Ok(reloaded)
    }
}
