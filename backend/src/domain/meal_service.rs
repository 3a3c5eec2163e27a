//! Meal registry service: ownership-scoped CRUD plus diet metrics.
//!
//! Each operation resolves the caller from the session token first, then
//! scopes every store access to that owner. A token that matches no user
//! behaves as matching zero records on the read paths; only creation rejects
//! it outright, since an unowned meal would break the ownership invariant.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use super::ports::{
    MealPersistenceError, MealRegistry, MealRepository, SessionAuthenticator,
};
use super::{DietMetrics, Error, Meal, MealDraft, MealId, MealPatch, SessionToken, UserId};

const MEAL_NOT_FOUND: &str = "Meal not found";

/// [`MealRegistry`] implementation over a meal repository port.
#[derive(Clone)]
pub struct MealService {
    authenticator: Arc<dyn SessionAuthenticator>,
    meals: Arc<dyn MealRepository>,
}

impl MealService {
    /// Create a new registry from its collaborating ports.
    pub fn new(
        authenticator: Arc<dyn SessionAuthenticator>,
        meals: Arc<dyn MealRepository>,
    ) -> Self {
        Self {
            authenticator,
            meals,
        }
    }

    async fn resolve_owner(&self, session: &SessionToken) -> Result<Option<UserId>, Error> {
        let user = self.authenticator.resolve(session).await?;
        Ok(user.map(|user| *user.id()))
    }
}

fn map_persistence_error(error: MealPersistenceError) -> Error {
    match error {
        MealPersistenceError::Connection { message } => Error::service_unavailable(message),
        MealPersistenceError::Query { message } => Error::internal(message),
    }
}

/// Missing and not-owned are deliberately indistinguishable.
fn meal_not_found() -> Error {
    Error::not_found(MEAL_NOT_FOUND)
}

#[async_trait]
impl MealRegistry for MealService {
    async fn create_meal(&self, session: &SessionToken, draft: MealDraft) -> Result<Meal, Error> {
        let Some(owner) = self.resolve_owner(session).await? else {
            return Err(Error::unauthorized("session matches no registered user"));
        };

        let MealDraft {
            name,
            description,
            is_on_diet,
            date,
        } = draft;
        let meal = Meal::new(
            MealId::random(),
            owner,
            name,
            description,
            is_on_diet,
            date.unwrap_or_else(Utc::now),
        );

        self.meals
            .insert(&meal)
            .await
            .map_err(map_persistence_error)?;

        info!(meal_id = %meal.id(), user_id = %owner, "meal logged");
        Ok(meal)
    }

    async fn list_meals(&self, session: &SessionToken) -> Result<Vec<Meal>, Error> {
        match self.resolve_owner(session).await? {
            Some(owner) => self
                .meals
                .list_by_owner(&owner)
                .await
                .map_err(map_persistence_error),
            None => Ok(Vec::new()),
        }
    }

    async fn get_meal(&self, session: &SessionToken, id: &MealId) -> Result<Meal, Error> {
        let Some(owner) = self.resolve_owner(session).await? else {
            return Err(meal_not_found());
        };

        self.meals
            .find_owned(&owner, id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(meal_not_found)
    }

    async fn update_meal(
        &self,
        session: &SessionToken,
        id: &MealId,
        patch: MealPatch,
    ) -> Result<(), Error> {
        let Some(owner) = self.resolve_owner(session).await? else {
            return Err(meal_not_found());
        };

        let updated = self
            .meals
            .update_owned(&owner, id, &patch)
            .await
            .map_err(map_persistence_error)?;
        if !updated {
            return Err(meal_not_found());
        }

        info!(meal_id = %id, user_id = %owner, "meal amended");
        Ok(())
    }

    async fn delete_meal(&self, session: &SessionToken, id: &MealId) -> Result<(), Error> {
        let Some(owner) = self.resolve_owner(session).await? else {
            return Err(meal_not_found());
        };

        let deleted = self
            .meals
            .delete_owned(&owner, id)
            .await
            .map_err(map_persistence_error)?;
        if !deleted {
            return Err(meal_not_found());
        }

        info!(meal_id = %id, user_id = %owner, "meal deleted");
        Ok(())
    }

    async fn diet_metrics(&self, session: &SessionToken) -> Result<DietMetrics, Error> {
        match self.resolve_owner(session).await? {
            Some(owner) => {
                let meals = self
                    .meals
                    .list_by_owner(&owner)
                    .await
                    .map_err(map_persistence_error)?;
                Ok(DietMetrics::from_meals(&meals))
            }
            None => Ok(DietMetrics::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for ownership scoping and error mapping.
    use super::*;
    use crate::domain::ports::MockMealRepository;
    use crate::domain::{Email, ErrorCode, MealName, User, UserName};
    use chrono::TimeZone;
    use rstest::rstest;

    struct StubAuthenticator {
        user: Option<User>,
    }

    #[async_trait]
    impl SessionAuthenticator for StubAuthenticator {
        async fn resolve(&self, _token: &SessionToken) -> Result<Option<User>, Error> {
            Ok(self.user.clone())
        }
    }

    fn caller() -> User {
        User::new(
            UserId::random(),
            UserName::new("Ada Lovelace").expect("valid name"),
            Email::new("ada@example.com").expect("valid email"),
            SessionToken::generate(),
            Utc::now(),
        )
    }

    fn service_with(user: Option<User>, meals: MockMealRepository) -> MealService {
        MealService::new(
            Arc::new(StubAuthenticator { user }),
            Arc::new(meals),
        )
    }

    fn draft(name: &str, on_diet: bool, date: Option<chrono::DateTime<Utc>>) -> MealDraft {
        MealDraft {
            name: MealName::new(name).expect("valid name"),
            description: "a meal".to_owned(),
            is_on_diet: on_diet,
            date,
        }
    }

    fn meal_for(owner: UserId, name: &str, on_diet: bool, day: u32) -> Meal {
        Meal::new(
            MealId::random(),
            owner,
            MealName::new(name).expect("valid name"),
            String::new(),
            on_diet,
            Utc.with_ymd_and_hms(2026, 2, day, 12, 0, 0)
                .single()
                .expect("valid fixture date"),
        )
    }

    #[tokio::test]
    async fn create_rejects_unknown_sessions_without_inserting() {
        let mut meals = MockMealRepository::new();
        meals.expect_insert().never();

        let service = service_with(None, meals);
        let err = service
            .create_meal(&SessionToken::generate(), draft("Lunch", true, None))
            .await
            .expect_err("unknown session must not create");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn create_assigns_owner_and_keeps_supplied_date() {
        let user = caller();
        let owner = *user.id();
        let date = Utc.with_ymd_and_hms(2026, 3, 1, 8, 30, 0)
            .single()
            .expect("valid fixture date");

        let mut meals = MockMealRepository::new();
        meals.expect_insert().returning(|_| Ok(()));

        let service = service_with(Some(user), meals);
        let meal = service
            .create_meal(
                &SessionToken::generate(),
                draft("Breakfast", true, Some(date)),
            )
            .await
            .expect("creation succeeds");

        assert_eq!(meal.owner(), &owner);
        assert_eq!(meal.name().as_ref(), "Breakfast");
        assert!(meal.is_on_diet());
        assert_eq!(meal.date(), date);
    }

    #[tokio::test]
    async fn create_defaults_missing_date_to_submission_time() {
        let before = Utc::now();
        let mut meals = MockMealRepository::new();
        meals.expect_insert().returning(|_| Ok(()));

        let service = service_with(Some(caller()), meals);
        let meal = service
            .create_meal(&SessionToken::generate(), draft("Lunch", false, None))
            .await
            .expect("creation succeeds");

        assert!(meal.date() >= before);
        assert!(meal.date() <= Utc::now());
    }

    #[tokio::test]
    async fn list_is_empty_for_unknown_sessions() {
        let mut meals = MockMealRepository::new();
        meals.expect_list_by_owner().never();

        let service = service_with(None, meals);
        let listed = service
            .list_meals(&SessionToken::generate())
            .await
            .expect("listing succeeds");
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn get_reports_not_found_when_repository_misses() {
        let mut meals = MockMealRepository::new();
        meals.expect_find_owned().returning(|_, _| Ok(None));

        let service = service_with(Some(caller()), meals);
        let err = service
            .get_meal(&SessionToken::generate(), &MealId::random())
            .await
            .expect_err("miss surfaces as not-found");

        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "Meal not found");
    }

    #[rstest]
    #[case(false)]
    #[case(true)]
    #[tokio::test]
    async fn update_maps_row_count_to_outcome(#[case] matched: bool) {
        let mut meals = MockMealRepository::new();
        meals
            .expect_update_owned()
            .returning(move |_, _, _| Ok(matched));

        let service = service_with(Some(caller()), meals);
        let result = service
            .update_meal(
                &SessionToken::generate(),
                &MealId::random(),
                MealPatch {
                    description: Some("smaller portion".to_owned()),
                    ..MealPatch::default()
                },
            )
            .await;

        if matched {
            result.expect("update succeeds");
        } else {
            let err = result.expect_err("zero rows surfaces as not-found");
            assert_eq!(err.code(), ErrorCode::NotFound);
        }
    }

    #[tokio::test]
    async fn delete_reports_not_found_for_unmatched_rows() {
        let mut meals = MockMealRepository::new();
        meals.expect_delete_owned().returning(|_, _| Ok(false));

        let service = service_with(Some(caller()), meals);
        let err = service
            .delete_meal(&SessionToken::generate(), &MealId::random())
            .await
            .expect_err("zero rows surfaces as not-found");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn metrics_are_zero_for_unknown_sessions() {
        let mut meals = MockMealRepository::new();
        meals.expect_list_by_owner().never();

        let service = service_with(None, meals);
        let metrics = service
            .diet_metrics(&SessionToken::generate())
            .await
            .expect("metrics succeed");
        assert_eq!(metrics, DietMetrics::default());
    }

    #[tokio::test]
    async fn metrics_summarise_the_owners_meals() {
        let user = caller();
        let owner = *user.id();
        let history = vec![
            meal_for(owner, "Day 1", true, 1),
            meal_for(owner, "Day 2", true, 2),
            meal_for(owner, "Day 3", false, 3),
            meal_for(owner, "Day 4", true, 4),
        ];

        let mut meals = MockMealRepository::new();
        meals
            .expect_list_by_owner()
            .returning(move |_| Ok(history.clone()));

        let service = service_with(Some(user), meals);
        let metrics = service
            .diet_metrics(&SessionToken::generate())
            .await
            .expect("metrics succeed");

        assert_eq!(metrics.total, 4);
        assert_eq!(metrics.meals_in_diet, 3);
        assert_eq!(metrics.meals_out_diet, 1);
        assert_eq!(metrics.best_sequence, 2);
    }

    #[rstest]
    #[case(MealPersistenceError::connection("database unavailable"), ErrorCode::ServiceUnavailable)]
    #[case(MealPersistenceError::query("bad statement"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn list_maps_persistence_failures(
        #[case] failure: MealPersistenceError,
        #[case] expected: ErrorCode,
    ) {
        let mut meals = MockMealRepository::new();
        meals
            .expect_list_by_owner()
            .returning(move |_| Err(failure.clone()));

        let service = service_with(Some(caller()), meals);
        let err = service
            .list_meals(&SessionToken::generate())
            .await
            .expect_err("failure surfaces");
        assert_eq!(err.code(), expected);
    }
}
