//! Task assignment for ticket tracking.
//!
//! A task links one ticket to the users assigned to work on it. Creating a
//! task marks its ticket as assigned; afterwards users can be added to or
//! removed from the task. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
