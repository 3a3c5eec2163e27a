//! Driving port for the meal registry.
//!
//! Every operation takes the caller's session token; the implementation
//! resolves the owner itself and scopes each store access to it, mirroring
//! the per-request owner lookup the HTTP surface promises.

use async_trait::async_trait;

use crate::domain::{DietMetrics, Error, Meal, MealDraft, MealId, MealPatch, SessionToken};

/// Domain use-case port for meal CRUD and metrics.
#[async_trait]
pub trait MealRegistry: Send + Sync {
    /// Persist a new meal for the session's owner and return the stored record.
    async fn create_meal(&self, session: &SessionToken, draft: MealDraft) -> Result<Meal, Error>;

    /// All meals owned by the caller; empty when the session matches no user.
    async fn list_meals(&self, session: &SessionToken) -> Result<Vec<Meal>, Error>;

    /// A single meal owned by the caller, or not-found.
    async fn get_meal(&self, session: &SessionToken, id: &MealId) -> Result<Meal, Error>;

    /// Merge `patch` over an owned meal, or not-found.
    async fn update_meal(
        &self,
        session: &SessionToken,
        id: &MealId,
        patch: MealPatch,
    ) -> Result<(), Error>;

    /// Delete an owned meal, or not-found.
    async fn delete_meal(&self, session: &SessionToken, id: &MealId) -> Result<(), Error>;

    /// Aggregate diet metrics over the caller's meals.
    async fn diet_metrics(&self, session: &SessionToken) -> Result<DietMetrics, Error>;
}
