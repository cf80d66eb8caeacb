//! When steps for task assignment BDD scenarios.

use super::world::{TaskWorld, parse_user_ids, run_async};
use rstest_bdd_macros::when;
use taskdesk::task::{
    domain::TicketId,
    services::{CreateTaskRequest, TaskUsersRequest},
};

#[when("a task is created for ticket {ticket:u64} with users {users}")]
fn create_task(world: &mut TaskWorld, ticket: u64, users: String) -> Result<(), eyre::Report> {
    let request =
        CreateTaskRequest::new(TicketId::new(ticket)?).with_user_ids(parse_user_ids(&users)?);
    let result = run_async(world.coordinator.create(request));
    world.record(result);
    Ok(())
}

#[when("users {users} are added to the task")]
fn add_users(world: &mut TaskWorld, users: String) -> Result<(), eyre::Report> {
    let request = TaskUsersRequest::from_user_ids(world.task()?.id(), parse_user_ids(&users)?);
    let result = run_async(world.coordinator.add_users_to_task(request));
    world.record(result);
    Ok(())
}

#[when("users {users} are removed from the task")]
fn remove_users(world: &mut TaskWorld, users: String) -> Result<(), eyre::Report> {
    let request = TaskUsersRequest::from_user_ids(world.task()?.id(), parse_user_ids(&users)?);
    let result = run_async(world.coordinator.remove_users_from_task(request));
    world.record(result);
    Ok(())
}
