//! Meals API handlers.
//!
//! ```text
//! POST /meals {"name":"Lunch","description":"salad","isOnDiet":true,"date":"2026-02-01T12:00:00Z"}
//! GET /meals
//! GET /meals/metrics
//! GET /meals/{id}
//! PUT /meals/{id}
//! DELETE /meals/{id}
//! ```
//!
//! Every handler requires a session cookie and fails with `401` before any
//! registry call when it is absent.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    DietMetrics, Error, Meal, MealDraft, MealId, MealName, MealPatch, MealValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_optional_rfc3339_timestamp, parse_uuid,
};

/// Request payload for logging a meal.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_on_diet: Option<bool>,
    #[schema(format = "date-time")]
    pub date: Option<String>,
}

/// Request payload for amending a meal; absent fields keep stored values.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMealRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_on_diet: Option<bool>,
    #[schema(format = "date-time")]
    pub date: Option<String>,
}

/// A stored meal as returned to its owner.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MealBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub name: String,
    pub description: String,
    pub is_on_diet: bool,
    #[schema(format = "date-time")]
    pub date: String,
}

impl From<Meal> for MealBody {
    fn from(value: Meal) -> Self {
        Self {
            id: value.id().to_string(),
            name: value.name().to_string(),
            description: value.description().to_owned(),
            is_on_diet: value.is_on_diet(),
            date: value.date().to_rfc3339(),
        }
    }
}

/// Envelope for single-meal responses.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MealResponse {
    pub meal: MealBody,
}

/// Envelope for the meal list.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MealsResponse {
    pub meals: Vec<MealBody>,
}

/// Aggregate metrics payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricsBody {
    pub total: u64,
    pub meals_in_diet: u64,
    pub meals_out_diet: u64,
    pub best_sequence: u64,
}

impl From<DietMetrics> for MetricsBody {
    fn from(value: DietMetrics) -> Self {
        Self {
            total: value.total,
            meals_in_diet: value.meals_in_diet,
            meals_out_diet: value.meals_out_diet,
            best_sequence: value.best_sequence,
        }
    }
}

/// Envelope for the metrics response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricsResponse {
    pub metrics: MetricsBody,
}

fn map_meal_name_error(err: MealValidationError) -> Error {
    match err {
        MealValidationError::EmptyName => Error::invalid_request("name must not be empty")
            .with_details(json!({ "field": "name", "code": "empty_name" })),
        MealValidationError::NameTooLong { max } => {
            Error::invalid_request(format!("name must be at most {max} characters"))
                .with_details(json!({ "field": "name", "code": "name_too_long" }))
        }
        other => Error::internal(format!("unexpected name validation failure: {other}")),
    }
}

fn parse_required_name(value: Option<String>) -> Result<MealName, Error> {
    let raw = value.ok_or_else(|| missing_field_error(FieldName::new("name")))?;
    MealName::new(raw).map_err(map_meal_name_error)
}

fn parse_draft(payload: CreateMealRequest) -> Result<MealDraft, Error> {
    let CreateMealRequest {
        name,
        description,
        is_on_diet,
        date,
    } = payload;

    Ok(MealDraft {
        name: parse_required_name(name)?,
        description: description
            .ok_or_else(|| missing_field_error(FieldName::new("description")))?,
        is_on_diet: is_on_diet.ok_or_else(|| missing_field_error(FieldName::new("isOnDiet")))?,
        date: parse_optional_rfc3339_timestamp(date, FieldName::new("date"))?,
    })
}

fn parse_patch(payload: UpdateMealRequest) -> Result<MealPatch, Error> {
    let UpdateMealRequest {
        name,
        description,
        is_on_diet,
        date,
    } = payload;

    Ok(MealPatch {
        name: name
            .map(|raw| MealName::new(raw).map_err(map_meal_name_error))
            .transpose()?,
        description,
        is_on_diet,
        date: parse_optional_rfc3339_timestamp(date, FieldName::new("date"))?,
    })
}

fn parse_meal_id(raw: &str) -> Result<MealId, Error> {
    parse_uuid(raw, FieldName::new("id")).map(MealId::from_uuid)
}

/// Log a meal for the authenticated user.
#[utoipa::path(
    post,
    path = "/meals",
    request_body = CreateMealRequest,
    responses(
        (status = 201, description = "Meal logged", body = MealResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["meals"],
    operation_id = "createMeal",
    security(("SessionCookie" = []))
)]
#[post("/meals")]
pub async fn create_meal(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateMealRequest>,
) -> ApiResult<HttpResponse> {
    let token = session.require_token()?;
    let draft = parse_draft(payload.into_inner())?;

    let meal = state.meals.create_meal(&token, draft).await?;
    Ok(HttpResponse::Created().json(MealResponse {
        meal: MealBody::from(meal),
    }))
}

/// List the authenticated user's meals.
#[utoipa::path(
    get,
    path = "/meals",
    responses(
        (status = 200, description = "Meals", body = MealsResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["meals"],
    operation_id = "listMeals",
    security(("SessionCookie" = []))
)]
#[get("/meals")]
pub async fn list_meals(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<MealsResponse>> {
    let token = session.require_token()?;
    let meals = state.meals.list_meals(&token).await?;
    Ok(web::Json(MealsResponse {
        meals: meals.into_iter().map(MealBody::from).collect(),
    }))
}

/// Aggregate diet metrics over the authenticated user's meals.
#[utoipa::path(
    get,
    path = "/meals/metrics",
    responses(
        (status = 200, description = "Diet metrics", body = MetricsResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["meals"],
    operation_id = "dietMetrics",
    security(("SessionCookie" = []))
)]
#[get("/meals/metrics")]
pub async fn diet_metrics(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<MetricsResponse>> {
    let token = session.require_token()?;
    let metrics = state.meals.diet_metrics(&token).await?;
    Ok(web::Json(MetricsResponse {
        metrics: MetricsBody::from(metrics),
    }))
}

/// Fetch a single meal owned by the authenticated user.
#[utoipa::path(
    get,
    path = "/meals/{id}",
    params(("id" = String, Path, description = "Meal identifier")),
    responses(
        (status = 200, description = "Meal", body = MealResponse),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Meal not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["meals"],
    operation_id = "getMeal",
    security(("SessionCookie" = []))
)]
#[get("/meals/{id}")]
pub async fn get_meal(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<MealResponse>> {
    let token = session.require_token()?;
    let id = parse_meal_id(&path.into_inner())?;

    let meal = state.meals.get_meal(&token, &id).await?;
    Ok(web::Json(MealResponse {
        meal: MealBody::from(meal),
    }))
}

/// Amend a meal owned by the authenticated user.
#[utoipa::path(
    put,
    path = "/meals/{id}",
    params(("id" = String, Path, description = "Meal identifier")),
    request_body = UpdateMealRequest,
    responses(
        (status = 200, description = "Meal amended"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Meal not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["meals"],
    operation_id = "updateMeal",
    security(("SessionCookie" = []))
)]
#[put("/meals/{id}")]
pub async fn update_meal(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateMealRequest>,
) -> ApiResult<HttpResponse> {
    let token = session.require_token()?;
    let id = parse_meal_id(&path.into_inner())?;
    let patch = parse_patch(payload.into_inner())?;

    state.meals.update_meal(&token, &id, patch).await?;
    Ok(HttpResponse::Ok().finish())
}

/// Delete a meal owned by the authenticated user.
#[utoipa::path(
    delete,
    path = "/meals/{id}",
    params(("id" = String, Path, description = "Meal identifier")),
    responses(
        (status = 200, description = "Meal deleted"),
        (status = 400, description = "Invalid identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Meal not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["meals"],
    operation_id = "deleteMeal",
    security(("SessionCookie" = []))
)]
#[delete("/meals/{id}")]
pub async fn delete_meal(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let token = session.require_token()?;
    let id = parse_meal_id(&path.into_inner())?;

    state.meals.delete_meal(&token, &id).await?;
    Ok(HttpResponse::Ok().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SessionToken;
    use crate::inbound::http::session::SESSION_TOKEN_KEY;
    use crate::inbound::http::test_utils::{
        RecordingUserRegistry, UnreachableMealRegistry, test_session_middleware,
    };
    use actix_session::Session;
    use actix_web::{App, http::StatusCode, test as actix_test, web};
    use rstest::rstest;
    use serde_json::Value;
    use std::sync::Arc;

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let state = HttpState::new(
            Arc::new(RecordingUserRegistry::default()),
            Arc::new(UnreachableMealRegistry),
        );
        App::new()
            .app_data(web::Data::new(state))
            .wrap(test_session_middleware())
            .route(
                "/issue-session",
                web::get().to(|session: Session| async move {
                    session
                        .insert(SESSION_TOKEN_KEY, SessionToken::generate().to_string())
                        .expect("issue session token");
                    actix_web::HttpResponse::Ok().finish()
                }),
            )
            .service(create_meal)
            .service(list_meals)
            .service(diet_metrics)
            .service(get_meal)
            .service(update_meal)
            .service(delete_meal)
    }

    async fn session_cookie<S, B>(app: &S) -> actix_web::cookie::Cookie<'static>
    where
        S: actix_web::dev::Service<
                actix_http::Request,
                Response = actix_web::dev::ServiceResponse<B>,
                Error = actix_web::Error,
            >,
        B: actix_web::body::MessageBody,
    {
        let response = actix_test::call_service(
            app,
            actix_test::TestRequest::get()
                .uri("/issue-session")
                .to_request(),
        )
        .await;
        response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned()
    }

    #[rstest]
    #[case("/meals")]
    #[case("/meals/metrics")]
    #[case("/meals/3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    #[actix_web::test]
    async fn reads_without_a_session_are_unauthorised(#[case] uri: &str) {
        let app = actix_test::init_service(test_app()).await;
        let response =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn create_without_a_session_is_unauthorised() {
        let app = actix_test::init_service(test_app()).await;
        let request = actix_test::TestRequest::post()
            .uri("/meals")
            .set_json(&CreateMealRequest {
                name: Some("Lunch".into()),
                description: Some("salad".into()),
                is_on_diet: Some(true),
                date: None,
            })
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn malformed_meal_id_is_a_validation_error() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = session_cookie(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/meals/not-a-uuid")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        let details = body.get("details").expect("details present");
        assert_eq!(details.get("field").and_then(Value::as_str), Some("id"));
        assert_eq!(
            details.get("code").and_then(Value::as_str),
            Some("invalid_uuid")
        );
    }

    #[rstest]
    #[case(
        CreateMealRequest { name: None, description: Some("salad".into()), is_on_diet: Some(true), date: None },
        "name",
        "missing_field"
    )]
    #[case(
        CreateMealRequest { name: Some("Lunch".into()), description: Some("salad".into()), is_on_diet: None, date: None },
        "isOnDiet",
        "missing_field"
    )]
    #[case(
        CreateMealRequest { name: Some("Lunch".into()), description: Some("salad".into()), is_on_diet: Some(true), date: Some("yesterday".into()) },
        "date",
        "invalid_timestamp"
    )]
    #[actix_web::test]
    async fn create_rejects_invalid_payloads(
        #[case] payload: CreateMealRequest,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let app = actix_test::init_service(test_app()).await;
        let cookie = session_cookie(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/meals")
                .cookie(cookie)
                .set_json(&payload)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        let details = body.get("details").expect("details present");
        assert_eq!(details.get("field").and_then(Value::as_str), Some(field));
        assert_eq!(details.get("code").and_then(Value::as_str), Some(code));
    }

    #[actix_web::test]
    async fn update_rejects_blank_names() {
        let app = actix_test::init_service(test_app()).await;
        let cookie = session_cookie(&app).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::put()
                .uri("/meals/3fa85f64-5717-4562-b3fc-2c963f66afa6")
                .cookie(cookie)
                .set_json(&UpdateMealRequest {
                    name: Some("   ".into()),
                    ..UpdateMealRequest::default()
                })
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        let details = body.get("details").expect("details present");
        assert_eq!(
            details.get("code").and_then(Value::as_str),
            Some("empty_name")
        );
    }
}
