//! Application services for task coordination.

mod coordinator;

pub use coordinator::{
    CreateTaskRequest, TaskCoordinator, TaskCoordinatorError, TaskCoordinatorResult, TaskErrorKind,
    TaskUsersRequest,
};
