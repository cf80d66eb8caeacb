//! Service layer coordinating tasks, their tickets, and their assignees.

use crate::task::{
    domain::{Task, TaskId, TicketId, TicketStatus, UserId, UserRef},
    ports::{
        TaskStore, TaskStoreError, TicketGateway, TicketGatewayError, UserGateway,
        UserGatewayError,
    },
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Request payload for creating a task for a ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    ticket_id: TicketId,
    users: Vec<UserRef>,
}

impl CreateTaskRequest {
    /// Creates a request for a ticket with no assignees.
    #[must_use]
    pub const fn new(ticket_id: TicketId) -> Self {
        Self {
            ticket_id,
            users: Vec::new(),
        }
    }

    /// Sets the assignees.
    #[must_use]
    pub fn with_users(mut self, users: impl IntoIterator<Item = UserRef>) -> Self {
        self.users = users.into_iter().collect();
        self
    }

    /// Sets the assignees by identifier.
    #[must_use]
    pub fn with_user_ids(self, user_ids: impl IntoIterator<Item = UserId>) -> Self {
        self.with_users(user_ids.into_iter().map(UserRef::new))
    }

    /// Returns the ticket identifier.
    #[must_use]
    pub const fn ticket_id(&self) -> TicketId {
        self.ticket_id
    }

    /// Returns the requested assignees.
    #[must_use]
    pub fn users(&self) -> &[UserRef] {
        &self.users
    }
}

/// Request payload naming users to add to or remove from a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUsersRequest {
    task_id: TaskId,
    users: Vec<UserRef>,
}

impl TaskUsersRequest {
    /// Creates a request for a task.
    #[must_use]
    pub fn new(task_id: TaskId, users: impl IntoIterator<Item = UserRef>) -> Self {
        Self {
            task_id,
            users: users.into_iter().collect(),
        }
    }

    /// Creates a request naming users by identifier.
    #[must_use]
    pub fn from_user_ids(task_id: TaskId, user_ids: impl IntoIterator<Item = UserId>) -> Self {
        Self::new(task_id, user_ids.into_iter().map(UserRef::new))
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the named users.
    #[must_use]
    pub fn users(&self) -> &[UserRef] {
        &self.users
    }
}

/// Coarse classification of coordinator failures for outer layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskErrorKind {
    /// A task or ticket does not exist.
    NotFound,
    /// A structural precondition does not hold.
    BadRequest,
    /// A referenced user does not exist.
    UnknownUser,
    /// Storage or a gateway failed.
    Internal,
}

/// Service-level errors for task coordination.
#[derive(Debug, Error)]
pub enum TaskCoordinatorError {
    /// No task has the identifier.
    #[error("task with id {0} not found")]
    TaskNotFound(TaskId),

    /// No ticket has the identifier.
    #[error("ticket with id {0} not found")]
    TicketNotFound(TicketId),

    /// The ticket exists but has no task.
    #[error("there is no task for ticket with id {0}")]
    NoTaskForTicket(TicketId),

    /// The ticket already has a task.
    #[error("a task already exists for ticket with id {0}")]
    DuplicateTaskForTicket(TicketId),

    /// A referenced user does not exist.
    #[error("user with id {0} not found")]
    UnknownUser(UserId),

    /// Task storage failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),

    /// The ticket service failed.
    #[error(transparent)]
    TicketGateway(TicketGatewayError),

    /// The user service failed.
    #[error(transparent)]
    UserGateway(#[from] UserGatewayError),
}

impl TaskCoordinatorError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> TaskErrorKind {
        match self {
            Self::TaskNotFound(_)
            | Self::TicketNotFound(_)
            | Self::NoTaskForTicket(_)
            | Self::Store(TaskStoreError::NotFound(_)) => TaskErrorKind::NotFound,
            Self::DuplicateTaskForTicket(_)
            | Self::Store(TaskStoreError::DuplicateTicketTask(_)) => TaskErrorKind::BadRequest,
            Self::UnknownUser(_) => TaskErrorKind::UnknownUser,
            Self::Store(_) | Self::TicketGateway(_) | Self::UserGateway(_) => {
                TaskErrorKind::Internal
            }
        }
    }
}

impl From<TicketGatewayError> for TaskCoordinatorError {
    fn from(err: TicketGatewayError) -> Self {
        match err {
            TicketGatewayError::NotFound(ticket_id) => Self::TicketNotFound(ticket_id),
            other @ TicketGatewayError::Backend(_) => Self::TicketGateway(other),
        }
    }
}

/// Result type for task coordinator operations.
pub type TaskCoordinatorResult<T> = Result<T, TaskCoordinatorError>;

/// Orchestrates task creation and assignee changes.
///
/// The coordinator holds no state between calls. Tickets and users are only
/// checked and referenced through their gateways; the store is the system
/// of record for tasks.
#[derive(Clone)]
pub struct TaskCoordinator<S, T, U, C>
where
    S: TaskStore,
    T: TicketGateway,
    U: UserGateway,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    tickets: Arc<T>,
    users: Arc<U>,
    clock: Arc<C>,
}

impl<S, T, U, C> TaskCoordinator<S, T, U, C>
where
    S: TaskStore,
    T: TicketGateway,
    U: UserGateway,
    C: Clock + Send + Sync,
{
    /// Creates a new task coordinator.
    #[must_use]
    pub const fn new(store: Arc<S>, tickets: Arc<T>, users: Arc<U>, clock: Arc<C>) -> Self {
        Self {
            store,
            tickets,
            users,
            clock,
        }
    }

    /// Creates the task for a ticket and marks the ticket as assigned.
    ///
    /// Checks run in order: the ticket exists, the ticket has no task yet,
    /// every requested user exists. Nothing is stored unless all pass.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCoordinatorError::TicketNotFound`],
    /// [`TaskCoordinatorError::DuplicateTaskForTicket`] or
    /// [`TaskCoordinatorError::UnknownUser`] when a check fails, and
    /// infrastructure variants when storage or a gateway fails.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskCoordinatorResult<Task> {
        let CreateTaskRequest { ticket_id, users } = request;

        self.tickets.verify_ticket_exists(ticket_id).await?;
        if self.task_exists_for_ticket(ticket_id).await? {
            return Err(TaskCoordinatorError::DuplicateTaskForTicket(ticket_id));
        }
        self.ensure_users_exist(&users).await?;

        let task = Task::new(ticket_id, users, &*self.clock);
        let persisted = self.store.create_and_reload(&task).await?;
        debug!(
            task_id = %persisted.id(),
            ticket_id = %ticket_id,
            assignees = persisted.users().len(),
            "created task"
        );

        self.change_ticket_status(persisted, TicketStatus::Assigned)
            .await
    }

    /// Adds users to a task.
    ///
    /// Users already assigned are skipped. Every user is checked before the
    /// task changes, so a failure leaves the stored task untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCoordinatorError::TaskNotFound`] when the task does not
    /// exist and [`TaskCoordinatorError::UnknownUser`] for the first user,
    /// in request order, that does not exist.
    pub async fn add_users_to_task(
        &self,
        request: TaskUsersRequest,
    ) -> TaskCoordinatorResult<Task> {
        let TaskUsersRequest { task_id, users } = request;
        let mut task = self.get_by_id(task_id).await?;
        self.ensure_users_exist(&users).await?;

        for user in users {
            if task.has_user(user.id()) {
                info!(
                    task_id = %task_id,
                    user_id = %user.id(),
                    username = user.username().unwrap_or_default(),
                    "user already assigned to task"
                );
                continue;
            }
            info!(
                task_id = %task_id,
                user_id = %user.id(),
                username = user.username().unwrap_or_default(),
                "adding user to task"
            );
            task.assign_user(user, &*self.clock);
        }

        Ok(self.store.save(&task).await?)
    }

    /// Removes users from a task.
    ///
    /// Users that are not assigned are skipped. Users are not checked
    /// against the user service, so stale references can always be removed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCoordinatorError::TaskNotFound`] when the task does not
    /// exist.
    pub async fn remove_users_from_task(
        &self,
        request: TaskUsersRequest,
    ) -> TaskCoordinatorResult<Task> {
        let TaskUsersRequest { task_id, users } = request;
        let mut task = self.get_by_id(task_id).await?;

        for user in &users {
            if task.unassign_user(user.id(), &*self.clock) {
                info!(task_id = %task_id, user_id = %user.id(), "removed user from task");
            } else {
                info!(
                    task_id = %task_id,
                    user_id = %user.id(),
                    username = user.username().unwrap_or_default(),
                    "user not assigned to task"
                );
            }
        }

        Ok(self.store.save(&task).await?)
    }

    /// Sets the status of the task's ticket.
    ///
    /// Transition rules are enforced by the ticket service. The returned
    /// task is unchanged apart from its ticket snapshot, which carries the
    /// new status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCoordinatorError::TicketNotFound`] when the ticket no
    /// longer exists.
    pub async fn change_ticket_status(
        &self,
        task: Task,
        status: TicketStatus,
    ) -> TaskCoordinatorResult<Task> {
        let ticket_id = task.ticket().id();
        self.tickets.change_status(ticket_id, status).await?;
        debug!(task_id = %task.id(), ticket_id = %ticket_id, %status, "changed ticket status");
        Ok(task.with_ticket_status(status))
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCoordinatorError::TaskNotFound`] when the task does not
    /// exist.
    pub async fn get_by_id(&self, task_id: TaskId) -> TaskCoordinatorResult<Task> {
        self.store
            .find_by_id(task_id)
            .await?
            .ok_or(TaskCoordinatorError::TaskNotFound(task_id))
    }

    /// Retrieves every task in store order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCoordinatorError::Store`] when the lookup fails.
    pub async fn get_all(&self) -> TaskCoordinatorResult<Vec<Task>> {
        Ok(self.store.find_all().await?)
    }

    /// Retrieves the task linked to a ticket.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCoordinatorError::NoTaskForTicket`] when the ticket has
    /// no task.
    pub async fn get_task_for_ticket(&self, ticket_id: TicketId) -> TaskCoordinatorResult<Task> {
        self.store
            .find_by_ticket(ticket_id)
            .await?
            .ok_or(TaskCoordinatorError::NoTaskForTicket(ticket_id))
    }

    /// Returns whether a task exists for the ticket.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCoordinatorError::Store`] when the lookup fails.
    pub async fn task_exists_for_ticket(&self, ticket_id: TicketId) -> TaskCoordinatorResult<bool> {
        Ok(self.store.find_by_ticket(ticket_id).await?.is_some())
    }

    /// Succeeds when the task exists.
    ///
    /// # Errors
    ///
    /// Returns [`TaskCoordinatorError::TaskNotFound`] when the task does not
    /// exist.
    pub async fn verify_task_exists(&self, task_id: TaskId) -> TaskCoordinatorResult<()> {
        self.get_by_id(task_id).await.map(|_| ())
    }

    async fn ensure_users_exist(&self, users: &[UserRef]) -> TaskCoordinatorResult<()> {
        for user in users {
            if !self.users.user_exists(user.id()).await? {
                return Err(TaskCoordinatorError::UnknownUser(user.id()));
            }
        }
        Ok(())
    }
}
