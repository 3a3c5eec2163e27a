//! Shared fixtures for endpoint integration tests.
//!
//! Wires the real domain services over in-memory repositories so the full
//! HTTP surface can be exercised without a database.

use std::sync::{Arc, Mutex};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::{App, web};
use async_trait::async_trait;
use serde_json::Value;

use backend::domain::ports::{
    MealPersistenceError, MealRepository, UserPersistenceError, UserRepository,
};
use backend::domain::{
    Meal, MealId, MealPatch, MealService, RegistrationService, SessionService, SessionToken, User,
    UserId,
};
use backend::inbound::http::meals::{
    create_meal, delete_meal, diet_metrics, get_meal, list_meals, update_meal,
};
use backend::inbound::http::state::HttpState;
use backend::inbound::http::users::{list_users, register_user};

/// In-memory [`UserRepository`] enforcing the unique-email constraint.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.lock().expect("users lock");
        if users.iter().any(|stored| stored.email() == user.email()) {
            return Err(UserPersistenceError::duplicate("users_email_key"));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_session(
        &self,
        token: &SessionToken,
    ) -> Result<Option<User>, UserPersistenceError> {
        let users = self.users.lock().expect("users lock");
        Ok(users.iter().find(|user| user.session() == token).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.users.lock().expect("users lock").clone())
    }
}

/// In-memory [`MealRepository`] with owner-scoped conditional mutations.
#[derive(Default)]
pub struct InMemoryMealRepository {
    meals: Mutex<Vec<Meal>>,
}

#[async_trait]
impl MealRepository for InMemoryMealRepository {
    async fn insert(&self, meal: &Meal) -> Result<(), MealPersistenceError> {
        self.meals.lock().expect("meals lock").push(meal.clone());
        Ok(())
    }

    async fn list_by_owner(&self, owner: &UserId) -> Result<Vec<Meal>, MealPersistenceError> {
        let meals = self.meals.lock().expect("meals lock");
        Ok(meals
            .iter()
            .filter(|meal| meal.owner() == owner)
            .cloned()
            .collect())
    }

    async fn find_owned(
        &self,
        owner: &UserId,
        id: &MealId,
    ) -> Result<Option<Meal>, MealPersistenceError> {
        let meals = self.meals.lock().expect("meals lock");
        Ok(meals
            .iter()
            .find(|meal| meal.owner() == owner && meal.id() == id)
            .cloned())
    }

    async fn update_owned(
        &self,
        owner: &UserId,
        id: &MealId,
        patch: &MealPatch,
    ) -> Result<bool, MealPersistenceError> {
        let mut meals = self.meals.lock().expect("meals lock");
        let Some(slot) = meals
            .iter_mut()
            .find(|meal| meal.owner() == owner && meal.id() == id)
        else {
            return Ok(false);
        };

        let name = patch.name.clone().unwrap_or_else(|| slot.name().clone());
        let description = patch
            .description
            .clone()
            .unwrap_or_else(|| slot.description().to_owned());
        let is_on_diet = patch.is_on_diet.unwrap_or_else(|| slot.is_on_diet());
        let date = patch.date.unwrap_or_else(|| slot.date());

        *slot = Meal::new(*slot.id(), *slot.owner(), name, description, is_on_diet, date);
        Ok(true)
    }

    async fn delete_owned(
        &self,
        owner: &UserId,
        id: &MealId,
    ) -> Result<bool, MealPersistenceError> {
        let mut meals = self.meals.lock().expect("meals lock");
        let before = meals.len();
        meals.retain(|meal| !(meal.owner() == owner && meal.id() == id));
        Ok(meals.len() < before)
    }
}

/// Build an application exposing the full HTTP surface over in-memory stores.
pub fn diet_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let user_repository = Arc::new(InMemoryUserRepository::default());
    let meal_repository = Arc::new(InMemoryMealRepository::default());

    let authenticator = Arc::new(SessionService::new(user_repository.clone()));
    let users = Arc::new(RegistrationService::new(user_repository));
    let meals = Arc::new(MealService::new(authenticator, meal_repository));
    let state = HttpState::new(users, meals);

    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build();

    App::new().app_data(web::Data::new(state)).service(
        // Metrics before `{id}` so the literal segment wins the route match.
        web::scope("")
            .wrap(session)
            .service(register_user)
            .service(list_users)
            .service(create_meal)
            .service(list_meals)
            .service(diet_metrics)
            .service(get_meal)
            .service(update_meal)
            .service(delete_meal),
    )
}

/// Register a user and return the issued session cookie.
pub async fn register<S, B>(app: &S, name: &str, email: &str) -> Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let response = actix_web::test::call_service(
        app,
        actix_web::test::TestRequest::post()
            .uri("/users")
            .set_json(serde_json::json!({ "name": name, "email": email }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), actix_web::http::StatusCode::CREATED);
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie issued")
        .into_owned()
}

/// Log a meal for the cookie's owner and return the stored meal id.
pub async fn log_meal<S, B>(app: &S, cookie: &Cookie<'static>, body: Value) -> String
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<B>,
            Error = actix_web::Error,
        >,
    B: actix_web::body::MessageBody,
{
    let response = actix_web::test::call_service(
        app,
        actix_web::test::TestRequest::post()
            .uri("/meals")
            .cookie(cookie.clone())
            .set_json(body)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), actix_web::http::StatusCode::CREATED);
    let body: Value = actix_web::test::read_body_json(response).await;
    body.get("meal")
        .and_then(|meal| meal.get("id"))
        .and_then(Value::as_str)
        .expect("meal id in response")
        .to_owned()
}
