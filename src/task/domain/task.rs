//! Task aggregate root linking one ticket to its assigned users.

use super::{TaskId, TicketId, TicketRef, TicketStatus, UserId, UserRef};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Task aggregate root.
///
/// A task references exactly one ticket and holds a set of user references
/// keyed by [`UserId`], so a user can be a member at most once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    ticket: TicketRef,
    users: BTreeMap<UserId, UserRef>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Ticket reference with its stored status.
    pub ticket: TicketRef,
    /// Assigned users with their stored usernames.
    pub users: Vec<UserRef>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new, not yet persisted task for a ticket.
    ///
    /// Repeated user identifiers collapse into one membership entry.
    #[must_use]
    pub fn new(
        ticket_id: TicketId,
        users: impl IntoIterator<Item = UserRef>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        let mut members = BTreeMap::new();
        for user in users {
            members.entry(user.id()).or_insert(user);
        }

        Self {
            id: TaskId::new(),
            ticket: TicketRef::new(ticket_id),
            users: members,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            ticket: data.ticket,
            users: data
                .users
                .into_iter()
                .map(|user| (user.id(), user))
                .collect(),
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the linked ticket reference.
    #[must_use]
    pub const fn ticket(&self) -> &TicketRef {
        &self.ticket
    }

    /// Returns assigned users in ascending identifier order.
    pub fn users(&self) -> impl ExactSizeIterator<Item = &UserRef> {
        self.users.values()
    }

    /// Returns the identifiers of assigned users in ascending order.
    #[must_use]
    pub fn user_ids(&self) -> Vec<UserId> {
        self.users.keys().copied().collect()
    }

    /// Returns whether the user is a member of this task.
    #[must_use]
    pub fn has_user(&self, user_id: UserId) -> bool {
        self.users.contains_key(&user_id)
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Adds a user to the membership set.
    ///
    /// Returns `false` and leaves the task untouched when the user is
    /// already a member.
    pub fn assign_user(&mut self, user: UserRef, clock: &impl Clock) -> bool {
        if self.users.contains_key(&user.id()) {
            return false;
        }
        self.users.insert(user.id(), user);
        self.updated_at = clock.utc();
        true
    }

    /// Removes a user from the membership set.
    ///
    /// Returns `false` and leaves the task untouched when the user is not a
    /// member.
    pub fn unassign_user(&mut self, user_id: UserId, clock: &impl Clock) -> bool {
        if self.users.remove(&user_id).is_none() {
            return false;
        }
        self.updated_at = clock.utc();
        true
    }

    /// Returns the task with its ticket snapshot carrying `status`.
    #[must_use]
    pub fn with_ticket_status(mut self, status: TicketStatus) -> Self {
        self.ticket = TicketRef::loaded(self.ticket.id(), status);
        self
    }
}
