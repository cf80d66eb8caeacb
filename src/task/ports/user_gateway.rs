//! Gateway port onto the user service.

use crate::task::domain::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for user gateway operations.
pub type UserGatewayResult<T> = Result<T, UserGatewayError>;

/// Narrow view of the user service used by task coordination.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserGateway: Send + Sync {
    /// Returns whether a user with the identifier exists.
    async fn user_exists(&self, user_id: UserId) -> UserGatewayResult<bool>;
}

/// Errors returned by user gateway implementations.
#[derive(Debug, Clone, Error)]
pub enum UserGatewayError {
    /// The user service failed.
    #[error("user gateway error: {0}")]
    Backend(Arc<dyn std::error::Error + Send + Sync>),
}

impl UserGatewayError {
    /// Wraps a backend error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Arc::new(err))
    }
}
