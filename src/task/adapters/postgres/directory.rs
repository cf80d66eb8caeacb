//! `PostgreSQL` gateways over the ticket and user tables.

use super::{
    blocking::{TaskPgPool, run_blocking_with},
    models::{ticket_id_column, user_id_column},
    schema::{tickets, users},
};
use crate::task::{
    domain::{TicketId, TicketStatus, UserId},
    ports::{
        TicketGateway, TicketGatewayError, TicketGatewayResult, UserGateway, UserGatewayError,
        UserGatewayResult,
    },
};
use async_trait::async_trait;
use diesel::dsl::exists;
use diesel::prelude::*;

/// Reads and writes the ticket and user tables shared with the services
/// that own them.
#[derive(Debug, Clone)]
pub struct PostgresDirectory {
    pool: TaskPgPool,
}

impl PostgresDirectory {
    /// Creates a directory from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketGateway for PostgresDirectory {
    async fn verify_ticket_exists(&self, ticket_id: TicketId) -> TicketGatewayResult<()> {
        let id = ticket_id_column(ticket_id).map_err(TicketGatewayError::backend)?;
        let found = run_blocking_with(
            &self.pool,
            move |connection| {
                diesel::select(exists(tickets::table.filter(tickets::id.eq(id))))
                    .get_result::<bool>(connection)
                    .map_err(TicketGatewayError::backend)
            },
            TicketGatewayError::backend,
        )
        .await?;

        if found {
            Ok(())
        } else {
            Err(TicketGatewayError::NotFound(ticket_id))
        }
    }

    async fn change_status(
        &self,
        ticket_id: TicketId,
        status: TicketStatus,
    ) -> TicketGatewayResult<()> {
        let id = ticket_id_column(ticket_id).map_err(TicketGatewayError::backend)?;
        let updated = run_blocking_with(
            &self.pool,
            move |connection| {
                diesel::update(tickets::table.filter(tickets::id.eq(id)))
                    .set(tickets::status.eq(status.as_str()))
                    .execute(connection)
                    .map_err(TicketGatewayError::backend)
            },
            TicketGatewayError::backend,
        )
        .await?;

        if updated == 0 {
            return Err(TicketGatewayError::NotFound(ticket_id));
        }
        Ok(())
    }
}

#[async_trait]
impl UserGateway for PostgresDirectory {
    async fn user_exists(&self, user_id: UserId) -> UserGatewayResult<bool> {
        let id = user_id_column(user_id).map_err(UserGatewayError::backend)?;
        run_blocking_with(
            &self.pool,
            move |connection| {
                diesel::select(exists(users::table.filter(users::id.eq(id))))
                    .get_result::<bool>(connection)
                    .map_err(UserGatewayError::backend)
            },
            UserGatewayError::backend,
        )
        .await
    }
}
