//! Port contracts for task assignment.
//!
//! Ports define infrastructure-agnostic interfaces used by the task
//! coordinator: one store for tasks and two gateways onto the services that
//! own tickets and users.

pub mod store;
pub mod ticket_gateway;
pub mod user_gateway;

pub use store::{TaskStore, TaskStoreError, TaskStoreResult};
pub use ticket_gateway::{TicketGateway, TicketGatewayError, TicketGatewayResult};
pub use user_gateway::{UserGateway, UserGatewayError, UserGatewayResult};

#[cfg(test)]
pub(crate) use store::MockTaskStore;
#[cfg(test)]
pub(crate) use ticket_gateway::MockTicketGateway;
#[cfg(test)]
pub(crate) use user_gateway::MockUserGateway;
