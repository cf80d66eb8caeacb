//! User references held in task membership.

use super::UserId;
use serde::{Deserialize, Serialize};

/// Reference from a task to an assigned user.
///
/// Membership comparisons use the identifier only. The username is present
/// once the reference has been loaded from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    id: UserId,
    username: Option<String>,
}

impl UserRef {
    /// Creates a reference carrying only the user identifier.
    #[must_use]
    pub const fn new(id: UserId) -> Self {
        Self { id, username: None }
    }

    /// Creates a reference with the username loaded from storage.
    #[must_use]
    pub fn loaded(id: UserId, username: impl Into<String>) -> Self {
        Self {
            id,
            username: Some(username.into()),
        }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the username when it has been loaded.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
}

impl From<UserId> for UserRef {
    fn from(id: UserId) -> Self {
        Self::new(id)
    }
}
