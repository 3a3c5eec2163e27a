//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::{MealService, RegistrationService, SessionService};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::meals::{
    create_meal, delete_meal, diet_metrics, get_meal, list_meals, update_meal,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::{list_users, register_user};
use crate::middleware::Trace;
use crate::outbound::persistence::{DieselMealRepository, DieselUserRepository};

/// Client-side lifetime of the session cookie.
const SESSION_TTL: Duration = Duration::days(7);

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

/// Build the driving-port state from Diesel-backed adapters.
fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let user_repository = Arc::new(DieselUserRepository::new(config.db_pool.clone()));
    let meal_repository = Arc::new(DieselMealRepository::new(config.db_pool.clone()));

    let authenticator = Arc::new(SessionService::new(user_repository.clone()));
    let users = Arc::new(RegistrationService::new(user_repository));
    let meals = Arc::new(MealService::new(authenticator, meal_repository));

    web::Data::new(HttpState::new(users, meals))
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(PersistentSession::default().session_ttl(SESSION_TTL))
        .build();

    // `/meals/metrics` is registered ahead of `/meals/{id}` so the literal
    // segment wins the route match.
    let api = web::scope("")
        .wrap(session)
        .service(register_user)
        .service(list_users)
        .service(create_meal)
        .service(list_meals)
        .service(diet_metrics)
        .service(get_meal)
        .service(update_meal)
        .service(delete_meal);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(ready)
        .service(live)
        .service(api);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        db_pool: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
