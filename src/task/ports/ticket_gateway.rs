//! Gateway port onto the ticket service.

use crate::task::domain::{TicketId, TicketStatus};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for ticket gateway operations.
pub type TicketGatewayResult<T> = Result<T, TicketGatewayError>;

/// Narrow view of the ticket service used by task coordination.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketGateway: Send + Sync {
    /// Succeeds when the ticket exists.
    ///
    /// # Errors
    ///
    /// Returns [`TicketGatewayError::NotFound`] when the ticket does not
    /// exist.
    async fn verify_ticket_exists(&self, ticket_id: TicketId) -> TicketGatewayResult<()>;

    /// Sets the status of a ticket.
    ///
    /// Whether the transition is legal is decided by the ticket service.
    ///
    /// # Errors
    ///
    /// Returns [`TicketGatewayError::NotFound`] when the ticket does not
    /// exist.
    async fn change_status(
        &self,
        ticket_id: TicketId,
        status: TicketStatus,
    ) -> TicketGatewayResult<()>;
}

/// Errors returned by ticket gateway implementations.
#[derive(Debug, Clone, Error)]
pub enum TicketGatewayError {
    /// The ticket was not found.
    #[error("ticket not found: {0}")]
    NotFound(TicketId),

    /// The ticket service failed.
    #[error("ticket gateway error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl TicketGatewayError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
