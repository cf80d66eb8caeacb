//! `PostgreSQL` task store.

use super::{
    blocking::{TaskPgPool, run_blocking_with},
    models::{
        TaskRow, TaskUserRow, member_from_columns, row_to_task, ticket_id_column, to_member_rows,
        to_new_row,
    },
    schema::{task_users, tasks, tickets, users},
};
use crate::task::{
    domain::{Task, TaskId, TicketId, UserRef},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use std::collections::HashMap;

/// Name of the unique constraint limiting tickets to one task.
pub(crate) const TICKET_UNIQUE_CONSTRAINT: &str = "tasks_ticket_id_unique";

/// `PostgreSQL`-backed task store.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: TaskPgPool,
}

impl PostgresTaskStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run<F, T>(&self, f: F) -> TaskStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        run_blocking_with(&self.pool, f, TaskStoreError::persistence).await
    }
}

impl From<DieselError> for TaskStoreError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskStore for PostgresTaskStore {
    async fn create_and_reload(&self, task: &Task) -> TaskStoreResult<Task> {
        let task_id = task.id();
        let ticket_id = task.ticket().id();
        let new_row = to_new_row(task).map_err(TaskStoreError::persistence)?;
        let member_rows = to_member_rows(task).map_err(TaskStoreError::persistence)?;

        self.run(move |connection| {
            connection.transaction(|tx| {
                // The unique constraint still guards the window between this
                // check and the insert.
                if find_task_by_ticket(tx, ticket_id)?.is_some() {
                    return Err(TaskStoreError::DuplicateTicketTask(ticket_id));
                }

                diesel::insert_into(tasks::table)
                    .values(&new_row)
                    .execute(tx)
                    .map_err(|err| map_insert_error(err, task_id, ticket_id))?;
                insert_members(tx, &member_rows)?;

                find_task(tx, task_id)?.ok_or(TaskStoreError::NotFound(task_id))
            })
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        self.run(move |connection| find_task(connection, id)).await
    }

    async fn find_all(&self) -> TaskStoreResult<Vec<Task>> {
        self.run(|connection| {
            let rows = tasks::table
                .inner_join(tickets::table)
                .select((TaskRow::as_select(), tickets::status))
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .load::<(TaskRow, String)>(connection)?;
            assemble(connection, rows)
        })
        .await
    }

    async fn find_by_ticket(&self, ticket_id: TicketId) -> TaskStoreResult<Option<Task>> {
        self.run(move |connection| find_task_by_ticket(connection, ticket_id))
            .await
    }

    async fn save(&self, task: &Task) -> TaskStoreResult<Task> {
        let task_id = task.id();
        let updated_at = task.updated_at();
        let member_rows = to_member_rows(task).map_err(TaskStoreError::persistence)?;

        self.run(move |connection| {
            connection.transaction(|tx| {
                let task_uuid = task_id.into_inner();
                let updated = diesel::update(tasks::table.filter(tasks::id.eq(task_uuid)))
                    .set(tasks::updated_at.eq(updated_at))
                    .execute(tx)?;
                if updated == 0 {
                    return Err(TaskStoreError::NotFound(task_id));
                }

                diesel::delete(task_users::table.filter(task_users::task_id.eq(task_uuid)))
                    .execute(tx)?;
                insert_members(tx, &member_rows)?;

                find_task(tx, task_id)?.ok_or(TaskStoreError::NotFound(task_id))
            })
        })
        .await
    }
}

fn find_task(connection: &mut PgConnection, id: TaskId) -> TaskStoreResult<Option<Task>> {
    let rows = tasks::table
        .inner_join(tickets::table)
        .filter(tasks::id.eq(id.into_inner()))
        .select((TaskRow::as_select(), tickets::status))
        .load::<(TaskRow, String)>(connection)?;
    Ok(assemble(connection, rows)?.into_iter().next())
}

fn find_task_by_ticket(
    connection: &mut PgConnection,
    ticket_id: TicketId,
) -> TaskStoreResult<Option<Task>> {
    let ticket_column = ticket_id_column(ticket_id).map_err(TaskStoreError::persistence)?;
    let rows = tasks::table
        .inner_join(tickets::table)
        .filter(tasks::ticket_id.eq(ticket_column))
        .select((TaskRow::as_select(), tickets::status))
        .load::<(TaskRow, String)>(connection)?;
    Ok(assemble(connection, rows)?.into_iter().next())
}

/// Loads memberships for the rows and builds tasks in row order.
fn assemble(
    connection: &mut PgConnection,
    rows: Vec<(TaskRow, String)>,
) -> TaskStoreResult<Vec<Task>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let task_ids: Vec<uuid::Uuid> = rows.iter().map(|(row, _)| row.id).collect();
    let member_rows = task_users::table
        .inner_join(users::table)
        .filter(task_users::task_id.eq_any(task_ids))
        .select((task_users::task_id, users::id, users::username))
        .order((task_users::task_id.asc(), users::id.asc()))
        .load::<(uuid::Uuid, i64, String)>(connection)?;

    let mut members: HashMap<uuid::Uuid, Vec<UserRef>> = HashMap::new();
    for (task_id, user_id, username) in member_rows {
        let user = member_from_columns(user_id, username).map_err(TaskStoreError::persistence)?;
        members.entry(task_id).or_default().push(user);
    }

    rows.into_iter()
        .map(|(row, status)| {
            let users = members.remove(&row.id).unwrap_or_default();
            row_to_task(row, &status, users).map_err(TaskStoreError::persistence)
        })
        .collect()
}

fn insert_members(connection: &mut PgConnection, rows: &[TaskUserRow]) -> TaskStoreResult<()> {
    if rows.is_empty() {
        return Ok(());
    }
    diesel::insert_into(task_users::table)
        .values(rows)
        .execute(connection)?;
    Ok(())
}

fn map_insert_error(err: DieselError, task_id: TaskId, ticket_id: TicketId) -> TaskStoreError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
            if is_ticket_unique_violation(info.as_ref()) =>
        {
            TaskStoreError::DuplicateTicketTask(ticket_id)
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            TaskStoreError::DuplicateTask(task_id)
        }
        _ => TaskStoreError::persistence(err),
    }
}

fn is_ticket_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == TICKET_UNIQUE_CONSTRAINT)
}
