//! Diesel row models and column conversions for task persistence.

use super::schema::{task_users, tasks};
use crate::task::domain::{
    ParseTicketStatusError, PersistedTaskData, Task, TaskDomainError, TaskId, TicketId, TicketRef,
    TicketStatus, UserId, UserRef,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use std::num::TryFromIntError;
use thiserror::Error;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Linked ticket identifier.
    pub ticket_id: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Internal task identifier.
    pub id: uuid::Uuid,
    /// Linked ticket identifier.
    pub ticket_id: i64,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task membership rows.
#[derive(Debug, Clone, PartialEq, Eq, Insertable)]
#[diesel(table_name = task_users)]
pub struct TaskUserRow {
    /// Task holding the membership.
    pub task_id: uuid::Uuid,
    /// Assigned user identifier.
    pub user_id: i64,
}

/// Failure converting between column values and domain values.
#[derive(Debug, Error)]
pub enum ColumnConversionError {
    /// A numeric identifier does not fit the target type.
    #[error("identifier out of range: {0}")]
    OutOfRange(#[from] TryFromIntError),
    /// A column value violates a domain rule.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// A status column holds an unknown value.
    #[error(transparent)]
    Status(#[from] ParseTicketStatusError),
}

/// Converts a ticket identifier into its column value.
pub fn ticket_id_column(id: TicketId) -> Result<i64, ColumnConversionError> {
    Ok(i64::try_from(id.value())?)
}

/// Converts a user identifier into its column value.
pub fn user_id_column(id: UserId) -> Result<i64, ColumnConversionError> {
    Ok(i64::try_from(id.value())?)
}

/// Reads a ticket identifier from its column value.
pub fn ticket_id_from_column(value: i64) -> Result<TicketId, ColumnConversionError> {
    Ok(TicketId::new(u64::try_from(value)?)?)
}

/// Reads a user identifier from its column value.
pub fn user_id_from_column(value: i64) -> Result<UserId, ColumnConversionError> {
    Ok(UserId::new(u64::try_from(value)?)?)
}

/// Builds the insert row for a new task.
pub fn to_new_row(task: &Task) -> Result<NewTaskRow, ColumnConversionError> {
    Ok(NewTaskRow {
        id: task.id().into_inner(),
        ticket_id: ticket_id_column(task.ticket().id())?,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

/// Builds the membership rows for a task.
pub fn to_member_rows(task: &Task) -> Result<Vec<TaskUserRow>, ColumnConversionError> {
    let task_id = task.id().into_inner();
    task.users()
        .map(|user| {
            Ok(TaskUserRow {
                task_id,
                user_id: user_id_column(user.id())?,
            })
        })
        .collect()
}

/// Reads a loaded user reference from joined membership columns.
pub fn member_from_columns(
    user_id: i64,
    username: String,
) -> Result<UserRef, ColumnConversionError> {
    Ok(UserRef::loaded(user_id_from_column(user_id)?, username))
}

/// Reconstructs a task from its row, joined ticket status, and members.
pub fn row_to_task(
    row: TaskRow,
    ticket_status: &str,
    users: Vec<UserRef>,
) -> Result<Task, ColumnConversionError> {
    let TaskRow {
        id,
        ticket_id,
        created_at,
        updated_at,
    } = row;

    let status = TicketStatus::try_from(ticket_status)?;
    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        ticket: TicketRef::loaded(ticket_id_from_column(ticket_id)?, status),
        users,
        created_at,
        updated_at,
    }))
}
