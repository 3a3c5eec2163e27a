//! Users API handlers.
//!
//! ```text
//! POST /users {"name":"Ada Lovelace","email":"ada@example.com"}
//! GET /users
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::RegistrationRequest;
use crate::domain::{Email, Error, User, UserName, UserValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error};

/// Registration request body for `POST /users`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// A registered user as returned by `GET /users`.
///
/// The session credential is deliberately absent from the payload.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<User> for UserBody {
    fn from(value: User) -> Self {
        Self {
            id: value.id().to_string(),
            name: value.name().to_string(),
            email: value.email().to_string(),
            created_at: value.created_at().to_rfc3339(),
        }
    }
}

/// Response payload for `GET /users`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UsersResponse {
    pub users: Vec<UserBody>,
}

fn parse_name(value: Option<String>) -> Result<UserName, Error> {
    let raw = value.ok_or_else(|| missing_field_error(FieldName::new("name")))?;
    UserName::new(raw).map_err(|err| match err {
        UserValidationError::EmptyName => Error::invalid_request("name must not be empty")
            .with_details(json!({ "field": "name", "code": "empty_name" })),
        UserValidationError::NameTooLong { max } => {
            Error::invalid_request(format!("name must be at most {max} characters"))
                .with_details(json!({ "field": "name", "code": "name_too_long" }))
        }
        other => Error::internal(format!("unexpected name validation failure: {other}")),
    })
}

fn parse_email(value: Option<String>) -> Result<Email, Error> {
    let raw = value.ok_or_else(|| missing_field_error(FieldName::new("email")))?;
    Email::new(raw).map_err(|_| {
        Error::invalid_request("email must be a valid address")
            .with_details(json!({ "field": "email", "code": "invalid_email" }))
    })
}

/// Register a new user and bind it to the request's session token.
///
/// A request that already carries a session keeps its token; otherwise a
/// fresh one is issued and persisted in the cookie.
#[utoipa::path(
    post,
    path = "/users",
    request_body = RegisterUserRequest,
    responses(
        (status = 201, description = "User registered", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users")]
pub async fn register_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterUserRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterUserRequest { name, email } = payload.into_inner();
    let name = parse_name(name)?;
    let email = parse_email(email)?;

    let token = session.token_or_issue()?;
    state
        .users
        .register(RegistrationRequest {
            name,
            email,
            session: token,
        })
        .await?;

    Ok(HttpResponse::Created().finish())
}

/// List registered users.
///
/// This endpoint takes no session guard: it is an open collaborator surface
/// kept as-is from the upstream access model.
#[utoipa::path(
    get,
    path = "/users",
    responses(
        (status = 200, description = "Users", body = UsersResponse),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security([])
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<web::Json<UsersResponse>> {
    let users = state.users.list_users().await?;
    Ok(web::Json(UsersResponse {
        users: users.into_iter().map(UserBody::from).collect(),
    }))
}
