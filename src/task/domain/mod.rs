//! Domain model for task assignment.
//!
//! Tasks link one ticket to a set of assigned users. Tickets and users are
//! owned elsewhere; the domain only holds references to them.

mod error;
mod ids;
mod task;
mod ticket;
mod user;

pub use error::{ParseTicketStatusError, TaskDomainError};
pub use ids::{TaskId, TicketId, UserId};
pub use task::{PersistedTaskData, Task};
pub use ticket::{TicketRef, TicketStatus};
pub use user::UserRef;
