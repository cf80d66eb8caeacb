//! Ticket and user gateways, and coordinator wiring, over `PostgreSQL`.

use crate::postgres::helpers::{PgContext, pg_context};
use rstest::rstest;
use taskdesk::task::{
    domain::{TicketId, TicketStatus, UserId},
    ports::{TicketGateway, TicketGatewayError, UserGateway},
    services::{CreateTaskRequest, TaskCoordinatorError, TaskUsersRequest},
};

#[rstest]
fn verify_ticket_exists_reports_missing_ticket(pg_context: PgContext) {
    let ctx = pg_context;
    let ticket = ctx.seed_ticket(3, TicketStatus::Open).expect("ticket");
    let absent = TicketId::new(4).expect("valid ticket id");

    ctx.rt
        .block_on(ctx.directory.verify_ticket_exists(ticket))
        .expect("seeded ticket exists");
    let result = ctx.rt.block_on(ctx.directory.verify_ticket_exists(absent));

    assert!(
        matches!(result, Err(TicketGatewayError::NotFound(id)) if id == absent),
        "expected NotFound, got: {result:?}"
    );
}

#[rstest]
#[case(TicketStatus::Assigned, "assigned")]
#[case(TicketStatus::InProgress, "in_progress")]
#[case(TicketStatus::Closed, "closed")]
fn change_status_writes_snake_case_value(
    pg_context: PgContext,
    #[case] status: TicketStatus,
    #[case] stored: &str,
) {
    let ctx = pg_context;
    let ticket = ctx.seed_ticket(3, TicketStatus::Open).expect("ticket");

    ctx.rt
        .block_on(ctx.directory.change_status(ticket, status))
        .expect("status change should succeed");

    assert_eq!(ctx.stored_status(ticket).expect("status"), stored);
}

#[rstest]
fn change_status_reports_missing_ticket(pg_context: PgContext) {
    let ctx = pg_context;
    let absent = TicketId::new(8).expect("valid ticket id");

    let result = ctx
        .rt
        .block_on(ctx.directory.change_status(absent, TicketStatus::Assigned));

    assert!(
        matches!(result, Err(TicketGatewayError::NotFound(id)) if id == absent),
        "expected NotFound, got: {result:?}"
    );
}

#[rstest]
fn user_exists_follows_user_table(pg_context: PgContext) {
    let ctx = pg_context;
    let known = ctx.seed_user(5, "alice").expect("user");
    let unknown = UserId::new(6).expect("valid user id");

    let known_exists = ctx.rt.block_on(ctx.directory.user_exists(known));
    let unknown_exists = ctx.rt.block_on(ctx.directory.user_exists(unknown));

    assert!(known_exists.expect("lookup should succeed"));
    assert!(!unknown_exists.expect("lookup should succeed"));
}

#[rstest]
fn coordinator_create_assigns_stored_ticket(pg_context: PgContext) {
    let ctx = pg_context;
    let ticket = ctx.seed_ticket(3, TicketStatus::Open).expect("ticket");
    let alice = ctx.seed_user(5, "alice").expect("user");
    let request = CreateTaskRequest::new(ticket).with_user_ids([alice]);

    let task = ctx
        .rt
        .block_on(ctx.coordinator.create(request))
        .expect("create should succeed");

    assert_eq!(task.ticket().status(), Some(TicketStatus::Assigned));
    assert_eq!(ctx.stored_status(ticket).expect("status"), "assigned");
    let found = ctx
        .rt
        .block_on(ctx.coordinator.get_task_for_ticket(ticket))
        .expect("task should be found");
    assert_eq!(found.id(), task.id());
    assert_eq!(found.ticket().status(), Some(TicketStatus::Assigned));
}

#[rstest]
fn coordinator_leaves_membership_alone_on_unknown_user(pg_context: PgContext) {
    let ctx = pg_context;
    let ticket = ctx.seed_ticket(3, TicketStatus::Open).expect("ticket");
    let alice = ctx.seed_user(5, "alice").expect("user");
    let ghost = UserId::new(77).expect("valid user id");
    let request = CreateTaskRequest::new(ticket).with_user_ids([alice]);
    let task = ctx
        .rt
        .block_on(ctx.coordinator.create(request))
        .expect("create should succeed");

    let added = TaskUsersRequest::from_user_ids(task.id(), [ghost]);
    let result = ctx.rt.block_on(ctx.coordinator.add_users_to_task(added));

    assert!(
        matches!(result, Err(TaskCoordinatorError::UnknownUser(id)) if id == ghost),
        "expected UnknownUser, got: {result:?}"
    );
    assert_eq!(ctx.membership_rows().expect("count"), 1);
}
