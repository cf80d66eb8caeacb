//! In-memory integration tests for task retrieval.

use super::helpers::{Desk, create_request, desk, ticket};
use rstest::rstest;
use taskdesk::task::{
    domain::{TaskId, TicketStatus},
    services::{TaskCoordinatorError, TaskErrorKind},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_are_found_by_ticket(desk: Desk) -> eyre::Result<()> {
    let first = desk.coordinator.create(create_request(10, &[1])?).await?;
    let second = desk
        .coordinator
        .create(create_request(11, &[2, 3])?)
        .await?;

    let by_ticket = desk.coordinator.get_task_for_ticket(ticket(11)?).await?;
    assert_eq!(by_ticket.id(), second.id());

    let all = desk.coordinator.get_all().await?;
    let ids: Vec<_> = all.iter().map(|task| task.id()).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&first.id()));
    assert!(ids.contains(&second.id()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_changes_are_visible_on_reload(desk: Desk) -> eyre::Result<()> {
    let created = desk.coordinator.create(create_request(10, &[1])?).await?;

    desk.coordinator
        .change_ticket_status(created.clone(), TicketStatus::InProgress)
        .await?;

    let reloaded = desk.coordinator.get_by_id(created.id()).await?;
    assert_eq!(reloaded.ticket().status(), Some(TicketStatus::InProgress));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_lookups_are_not_found(desk: Desk) -> eyre::Result<()> {
    let by_ticket = desk
        .coordinator
        .get_task_for_ticket(ticket(10)?)
        .await
        .expect_err("no task exists yet");
    assert_eq!(
        by_ticket.to_string(),
        "there is no task for ticket with id 10"
    );
    assert_eq!(by_ticket.kind(), TaskErrorKind::NotFound);

    let missing = TaskId::new();
    let by_id = desk.coordinator.get_by_id(missing).await;
    assert!(matches!(by_id, Err(TaskCoordinatorError::TaskNotFound(id)) if id == missing));
    Ok(())
}
