//! Shared test helpers for in-memory task assignment tests.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use taskdesk::task::{
    adapters::memory::{InMemoryDirectory, InMemoryTaskStore},
    domain::{TicketId, TicketStatus, UserId},
    services::{CreateTaskRequest, TaskCoordinator},
};
use tracing_subscriber::EnvFilter;

/// Coordinator wired to the in-memory adapters.
pub type TestCoordinator =
    TaskCoordinator<InMemoryTaskStore, InMemoryDirectory, InMemoryDirectory, DefaultClock>;

/// Ticket and user records shared by the coordinator under test.
pub struct Desk {
    pub directory: InMemoryDirectory,
    pub coordinator: TestCoordinator,
}

/// Routes coordinator logs to the test writer once per process.
///
/// Filtering follows `RUST_LOG`; a second call is a no-op.
pub fn init_tracing() {
    let _ignored = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Builds a ticket identifier for a known-valid literal.
///
/// # Errors
///
/// Returns an error when `value` is zero.
pub fn ticket(value: u64) -> eyre::Result<TicketId> {
    Ok(TicketId::new(value)?)
}

/// Builds a user identifier for a known-valid literal.
///
/// # Errors
///
/// Returns an error when `value` is zero.
pub fn user(value: u64) -> eyre::Result<UserId> {
    Ok(UserId::new(value)?)
}

/// Builds a create request for `ticket_value` naming `user_values`.
///
/// # Errors
///
/// Returns an error when any identifier is zero.
pub fn create_request(ticket_value: u64, user_values: &[u64]) -> eyre::Result<CreateTaskRequest> {
    let users = user_values
        .iter()
        .map(|value| user(*value))
        .collect::<eyre::Result<Vec<_>>>()?;
    Ok(CreateTaskRequest::new(ticket(ticket_value)?).with_user_ids(users))
}

/// Reads the status currently recorded for a ticket.
///
/// # Errors
///
/// Returns an error when the identifier is invalid or the directory is
/// unavailable.
pub fn ticket_status(desk: &Desk, ticket_value: u64) -> eyre::Result<Option<TicketStatus>> {
    Ok(desk.directory.ticket_status(ticket(ticket_value)?)?)
}

/// Provides a desk with tickets 10 and 11 open and users 1 to 3 registered.
#[fixture]
pub fn desk() -> Desk {
    init_tracing();
    let directory = InMemoryDirectory::new();
    for id in [10, 11] {
        let ticket_id = TicketId::new(id).expect("valid ticket id");
        directory
            .register_ticket(ticket_id, TicketStatus::Open)
            .expect("seed ticket");
    }
    for (id, name) in [(1, "ada"), (2, "grace"), (3, "linus")] {
        let user_id = UserId::new(id).expect("valid user id");
        directory.register_user(user_id, name).expect("seed user");
    }

    let store = InMemoryTaskStore::new(directory.clone());
    let shared_directory = Arc::new(directory.clone());
    let coordinator = TaskCoordinator::new(
        Arc::new(store),
        Arc::clone(&shared_directory),
        shared_directory,
        Arc::new(DefaultClock),
    );
    Desk {
        directory,
        coordinator,
    }
}
