//! PostgreSQL-backed `MealRepository` implementation using Diesel ORM.
//!
//! Ownership is enforced inside the SQL: single-record reads, updates and
//! deletes all filter on `(user_id, id)`, so "not mine" and "does not exist"
//! are indistinguishable at this layer, and the update carries no separate
//! existence check that could race a concurrent writer.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{MealPersistenceError, MealRepository};
use crate::domain::{Meal, MealId, MealName, MealPatch, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{MealChangeset, MealRow, NewMealRow};
use super::pool::{DbPool, PoolError};
use super::schema::meals;

/// Diesel-backed implementation of the `MealRepository` port.
#[derive(Clone)]
pub struct DieselMealRepository {
    pool: DbPool,
}

impl DieselMealRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> MealPersistenceError {
    map_pool_error(error, MealPersistenceError::connection)
}

fn map_diesel(error: diesel::result::Error) -> MealPersistenceError {
    map_diesel_error(
        error,
        |message| MealPersistenceError::query(message),
        |message| MealPersistenceError::connection(message),
    )
}

fn row_to_meal(row: MealRow) -> Result<Meal, MealPersistenceError> {
    let name = MealName::new(row.name).map_err(|err| {
        warn!(meal_id = %row.id, %err, "meal row failed domain validation");
        MealPersistenceError::query("stored meal has an invalid name")
    })?;

    Ok(Meal::new(
        MealId::from_uuid(row.id),
        UserId::from_uuid(row.user_id),
        name,
        row.description,
        row.is_on_diet,
        row.date,
    ))
}

fn changeset_from_patch(patch: &MealPatch) -> MealChangeset<'_> {
    MealChangeset {
        name: patch.name.as_ref().map(AsRef::as_ref),
        description: patch.description.as_deref(),
        is_on_diet: patch.is_on_diet,
        date: patch.date,
    }
}

#[async_trait]
impl MealRepository for DieselMealRepository {
    async fn insert(&self, meal: &Meal) -> Result<(), MealPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let new_row = NewMealRow {
            id: *meal.id().as_uuid(),
            user_id: *meal.owner().as_uuid(),
            name: meal.name().as_ref(),
            description: meal.description(),
            is_on_diet: meal.is_on_diet(),
            date: meal.date(),
        };

        diesel::insert_into(meals::table)
            .values(&new_row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel)
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Meal>, MealPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let rows: Vec<MealRow> = meals::table
            .filter(meals::user_id.eq(owner.as_uuid()))
            .select(MealRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel)?;

        rows.into_iter().map(row_to_meal).collect()
    }

    async fn find_owned(
        &self,
        owner: &UserId,
        id: &MealId,
    ) -> Result<Option<Meal>, MealPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let row: Option<MealRow> = meals::table
            .filter(
                meals::user_id
                    .eq(owner.as_uuid())
                    .and(meals::id.eq(id.as_uuid())),
            )
            .select(MealRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel)?;

        row.map(row_to_meal).transpose()
    }

    async fn update_owned(
        &self,
        owner: &UserId,
        id: &MealId,
        patch: &MealPatch,
    ) -> Result<bool, MealPersistenceError> {
        if patch.is_empty() {
            // Diesel rejects an empty changeset, so a no-op amendment
            // degrades to an ownership probe.
            return Ok(self.find_owned(owner, id).await?.is_some());
        }

        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let updated_rows = diesel::update(
            meals::table.filter(
                meals::user_id
                    .eq(owner.as_uuid())
                    .and(meals::id.eq(id.as_uuid())),
            ),
        )
        .set(changeset_from_patch(patch))
        .execute(&mut conn)
        .await
        .map_err(map_diesel)?;

        Ok(updated_rows > 0)
    }

    async fn delete_owned(
        &self,
        owner: &UserId,
        id: &MealId,
    ) -> Result<bool, MealPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;

        let deleted_rows = diesel::delete(
            meals::table.filter(
                meals::user_id
                    .eq(owner.as_uuid())
                    .and(meals::id.eq(id.as_uuid())),
            ),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel)?;

        Ok(deleted_rows > 0)
    }
}
