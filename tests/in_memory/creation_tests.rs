//! In-memory integration tests for task creation.

use super::helpers::{Desk, create_request, desk, ticket, ticket_status, user};
use rstest::rstest;
use taskdesk::task::{
    domain::{TicketStatus, UserRef},
    services::{TaskCoordinatorError, TaskErrorKind},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn creating_a_task_assigns_its_ticket(desk: Desk) -> eyre::Result<()> {
    let created = desk.coordinator.create(create_request(10, &[1])?).await?;

    assert_eq!(created.ticket().id(), ticket(10)?);
    assert_eq!(created.ticket().status(), Some(TicketStatus::Assigned));
    let users: Vec<_> = created.users().cloned().collect();
    assert_eq!(users, vec![UserRef::loaded(user(1)?, "ada")]);
    assert_eq!(ticket_status(&desk, 10)?, Some(TicketStatus::Assigned));
    assert_eq!(ticket_status(&desk, 11)?, Some(TicketStatus::Open));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_task_for_a_ticket_is_a_bad_request(desk: Desk) -> eyre::Result<()> {
    desk.coordinator.create(create_request(10, &[1])?).await?;

    let err = desk
        .coordinator
        .create(create_request(10, &[2])?)
        .await
        .expect_err("duplicate create should fail");

    assert_eq!(err.kind(), TaskErrorKind::BadRequest);
    assert_eq!(desk.coordinator.get_all().await?.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_user_leaves_ticket_untouched(desk: Desk) -> eyre::Result<()> {
    let err = desk
        .coordinator
        .create(create_request(11, &[2, 404])?)
        .await
        .expect_err("unknown user should fail");

    assert!(matches!(err, TaskCoordinatorError::UnknownUser(id) if id == user(404)?));
    assert!(!desk.coordinator.task_exists_for_ticket(ticket(11)?).await?);
    assert_eq!(ticket_status(&desk, 11)?, Some(TicketStatus::Open));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_ticket_is_not_found(desk: Desk) -> eyre::Result<()> {
    let err = desk
        .coordinator
        .create(create_request(99, &[])?)
        .await
        .expect_err("unknown ticket should fail");

    assert_eq!(err.kind(), TaskErrorKind::NotFound);
    assert_eq!(err.to_string(), "ticket with id 99 not found");
    Ok(())
}
