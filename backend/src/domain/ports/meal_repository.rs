//! Driven port for meal persistence adapters and their errors.
//!
//! Ownership is part of the port contract: single-record reads, updates and
//! deletes take the owner id and must filter on it inside the query, so a
//! missing row and a row owned by someone else are indistinguishable to
//! callers.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Meal, MealId, MealPatch, UserId};

/// Persistence errors raised by [`MealRepository`] adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MealPersistenceError {
    /// Repository connection could not be established.
    #[error("meal repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("meal repository query failed: {message}")]
    Query { message: String },
}

impl MealPersistenceError {
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
}

/// Persistence port for meal records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MealRepository: Send + Sync {
    /// Persist a new meal.
    async fn insert(&self, meal: &Meal) -> Result<(), MealPersistenceError>;

    /// Fetch every meal owned by `owner`, in store order.
    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Meal>, MealPersistenceError>;

    /// Fetch a single meal, only if `owner` owns it.
    async fn find_owned(
        &self,
        owner: &UserId,
        id: &MealId,
    ) -> Result<Option<Meal>, MealPersistenceError>;

    /// Merge `patch` over the stored meal in a single conditional update.
    ///
    /// Returns `false` when no row matched `(owner, id)`.
    async fn update_owned(
        &self,
        owner: &UserId,
        id: &MealId,
        patch: &MealPatch,
    ) -> Result<bool, MealPersistenceError>;

    /// Delete a meal in a single conditional statement.
    ///
    /// Returns `false` when no row matched `(owner, id)`.
    async fn delete_owned(&self, owner: &UserId, id: &MealId)
        -> Result<bool, MealPersistenceError>;
}
