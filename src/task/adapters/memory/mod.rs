//! In-memory adapters for task assignment.

mod directory;
mod store;

pub use directory::InMemoryDirectory;
pub use store::InMemoryTaskStore;
