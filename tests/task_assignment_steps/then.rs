//! Then steps for task assignment BDD scenarios.

use super::world::{TaskWorld, run_async};
use rstest_bdd_macros::then;
use taskdesk::task::{
    domain::{TicketId, TicketStatus, UserId},
    services::{TaskCoordinatorError, TaskErrorKind},
};

#[then("the task is returned with ticket {ticket:u64} assigned")]
fn task_returned_assigned(world: &TaskWorld, ticket: u64) -> Result<(), eyre::Report> {
    let task = world.task()?;
    if task.ticket().id() != TicketId::new(ticket)? {
        return Err(eyre::eyre!("task references ticket {}", task.ticket().id()));
    }
    if task.ticket().status() != Some(TicketStatus::Assigned) {
        return Err(eyre::eyre!(
            "expected assigned ticket, found {:?}",
            task.ticket().status()
        ));
    }
    Ok(())
}

#[then(r#"the task lists users "{usernames}""#)]
fn task_lists_users(world: &TaskWorld, usernames: String) -> Result<(), eyre::Report> {
    let stored = run_async(world.coordinator.get_by_id(world.task()?.id()))?;
    let actual: Vec<_> = stored
        .users()
        .map(|user| user.username().unwrap_or_default())
        .collect();
    let expected: Vec<_> = usernames.split(',').map(str::trim).collect();
    if actual != expected {
        return Err(eyre::eyre!("expected users {expected:?}, found {actual:?}"));
    }
    Ok(())
}

#[then(r#"ticket {ticket:u64} has status "{status}""#)]
fn ticket_has_status(world: &TaskWorld, ticket: u64, status: String) -> Result<(), eyre::Report> {
    let expected = TicketStatus::try_from(status.as_str())?;
    let actual = world.directory.ticket_status(TicketId::new(ticket)?)?;
    if actual != Some(expected) {
        return Err(eyre::eyre!("expected {expected}, found {actual:?}"));
    }
    Ok(())
}

#[then("the request fails as a bad request")]
fn fails_as_bad_request(world: &TaskWorld) -> Result<(), eyre::Report> {
    let err = world.last_error()?;
    if err.kind() != TaskErrorKind::BadRequest {
        return Err(eyre::eyre!("expected bad request, got {err:?}"));
    }
    Ok(())
}

#[then("the request fails because user {user:u64} is unknown")]
fn fails_with_unknown_user(world: &TaskWorld, user: u64) -> Result<(), eyre::Report> {
    let expected = UserId::new(user)?;
    let err = world.last_error()?;
    if !matches!(err, TaskCoordinatorError::UnknownUser(id) if *id == expected) {
        return Err(eyre::eyre!("expected unknown user {expected}, got {err:?}"));
    }
    Ok(())
}

#[then("no task exists for ticket {ticket:u64}")]
fn no_task_for_ticket(world: &TaskWorld, ticket: u64) -> Result<(), eyre::Report> {
    let ticket_id = TicketId::new(ticket)?;
    if run_async(world.coordinator.task_exists_for_ticket(ticket_id))? {
        return Err(eyre::eyre!("expected no task for ticket {ticket}"));
    }
    Ok(())
}
