//! Taskdesk: task assignment core for a ticket-tracking backend.
//!
//! A task links exactly one ticket to the set of users assigned to it. This
//! crate validates those links against the services owning tickets and
//! users, keeps task membership consistent, and delegates storage to a task
//! store.
//!
//! # Architecture
//!
//! Taskdesk follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, in-memory)
//!
//! # Modules
//!
//! - [`task`]: Task creation, assignee management, and ticket status updates

pub mod task;
