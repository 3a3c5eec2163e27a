//! Driven port for user persistence adapters and their errors.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{SessionToken, User};

/// Persistence errors raised by [`UserRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserPersistenceError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query { message: String },
    /// A uniqueness constraint rejected the write.
    #[error("user repository constraint violated: {message}")]
    Duplicate { message: String },
}

impl UserPersistenceError {
    /// Helper for connection oriented failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Helper for uniqueness violations.
    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::Duplicate {
            message: message.into(),
        }
    }
}

/// Persistence port for user records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a newly registered user.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch the user owning the given session token, if any.
    async fn find_by_session(
        &self,
        token: &SessionToken,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch every registered user.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;
}
