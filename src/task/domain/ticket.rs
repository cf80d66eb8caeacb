//! Ticket references and ticket status values.

use super::{ParseTicketStatusError, TicketId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a ticket.
///
/// Transition rules belong to the ticket service; this core only writes
/// [`TicketStatus::Assigned`] once a task has been created for a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Ticket has been raised and nobody works on it yet.
    Open,
    /// A task with assignees exists for the ticket.
    Assigned,
    /// Work on the ticket has started.
    InProgress,
    /// Work is finished and awaits confirmation.
    Resolved,
    /// Ticket is closed.
    Closed,
}

impl TicketStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Assigned => "assigned",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
            Self::Closed => "closed",
        }
    }
}

impl TryFrom<&str> for TicketStatus {
    type Error = ParseTicketStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "open" => Ok(Self::Open),
            "assigned" => Ok(Self::Assigned),
            "in_progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            _ => Err(ParseTicketStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference from a task to its ticket.
///
/// Callers usually supply only the identifier; references loaded from
/// storage also carry the ticket's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRef {
    id: TicketId,
    status: Option<TicketStatus>,
}

impl TicketRef {
    /// Creates a reference carrying only the ticket identifier.
    #[must_use]
    pub const fn new(id: TicketId) -> Self {
        Self { id, status: None }
    }

    /// Creates a reference with the ticket status loaded from storage.
    #[must_use]
    pub const fn loaded(id: TicketId, status: TicketStatus) -> Self {
        Self {
            id,
            status: Some(status),
        }
    }

    /// Returns the ticket identifier.
    #[must_use]
    pub const fn id(&self) -> TicketId {
        self.id
    }

    /// Returns the ticket status when it has been loaded.
    #[must_use]
    pub const fn status(&self) -> Option<TicketStatus> {
        self.status
    }
}
