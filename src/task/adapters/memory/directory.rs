//! In-memory ticket and user directory.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::task::{
    domain::{TicketId, TicketRef, TicketStatus, UserId, UserRef},
    ports::{
        TicketGateway, TicketGatewayError, TicketGatewayResult, UserGateway, UserGatewayError,
        UserGatewayResult,
    },
};

/// Thread-safe stand-in for the ticket and user services.
///
/// Implements both [`TicketGateway`] and [`UserGateway`]. Clones share the
/// same underlying records, so a clone handed to an
/// [`InMemoryTaskStore`](super::InMemoryTaskStore) sees tickets and users
/// registered later.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    tickets: HashMap<TicketId, TicketStatus>,
    users: HashMap<UserId, String>,
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a ticket, replacing the status of an existing one.
    ///
    /// # Errors
    ///
    /// Returns [`TicketGatewayError::Backend`] when the directory lock is
    /// poisoned.
    pub fn register_ticket(
        &self,
        ticket_id: TicketId,
        status: TicketStatus,
    ) -> TicketGatewayResult<()> {
        let mut state = self.write_state().map_err(TicketGatewayError::backend)?;
        state.tickets.insert(ticket_id, status);
        Ok(())
    }

    /// Registers a user, replacing the username of an existing one.
    ///
    /// # Errors
    ///
    /// Returns [`UserGatewayError::Backend`] when the directory lock is
    /// poisoned.
    pub fn register_user(
        &self,
        user_id: UserId,
        username: impl Into<String>,
    ) -> UserGatewayResult<()> {
        let mut state = self.write_state().map_err(UserGatewayError::backend)?;
        state.users.insert(user_id, username.into());
        Ok(())
    }

    /// Returns the current status of a ticket, if registered.
    ///
    /// # Errors
    ///
    /// Returns [`TicketGatewayError::Backend`] when the directory lock is
    /// poisoned.
    pub fn ticket_status(&self, ticket_id: TicketId) -> TicketGatewayResult<Option<TicketStatus>> {
        let state = self.read_state().map_err(TicketGatewayError::backend)?;
        Ok(state.tickets.get(&ticket_id).copied())
    }

    /// Loads a ticket reference with its current status.
    pub(super) fn load_ticket(&self, ticket_id: TicketId) -> std::io::Result<Option<TicketRef>> {
        let state = self.read_state()?;
        Ok(state
            .tickets
            .get(&ticket_id)
            .map(|status| TicketRef::loaded(ticket_id, *status)))
    }

    /// Loads a user reference with its current username.
    pub(super) fn load_user(&self, user_id: UserId) -> std::io::Result<Option<UserRef>> {
        let state = self.read_state()?;
        Ok(state
            .users
            .get(&user_id)
            .map(|username| UserRef::loaded(user_id, username.clone())))
    }

    fn read_state(&self) -> std::io::Result<RwLockReadGuard<'_, DirectoryState>> {
        self.state
            .read()
            .map_err(|err| std::io::Error::other(err.to_string()))
    }

    fn write_state(&self) -> std::io::Result<RwLockWriteGuard<'_, DirectoryState>> {
        self.state
            .write()
            .map_err(|err| std::io::Error::other(err.to_string()))
    }
}

#[async_trait]
impl TicketGateway for InMemoryDirectory {
    async fn verify_ticket_exists(&self, ticket_id: TicketId) -> TicketGatewayResult<()> {
        let state = self.read_state().map_err(TicketGatewayError::backend)?;
        if state.tickets.contains_key(&ticket_id) {
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
        let mut state = self.write_state().map_err(TicketGatewayError::backend)?;
        let current = state
            .tickets
            .get_mut(&ticket_id)
            .ok_or(TicketGatewayError::NotFound(ticket_id))?;
        *current = status;
        Ok(())
    }
}

#[async_trait]
impl UserGateway for InMemoryDirectory {
    async fn user_exists(&self, user_id: UserId) -> UserGatewayResult<bool> {
        let state = self.read_state().map_err(UserGatewayError::backend)?;
        Ok(state.users.contains_key(&user_id))
    }
}
