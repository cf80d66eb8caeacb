//! Step definitions for task assignment scenarios.

pub mod then;
pub mod when;
