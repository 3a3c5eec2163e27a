//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the strongly typed entities and use-cases the HTTP and
//! persistence layers depend on. Types are immutable, constructed through
//! validating constructors, and free of transport concerns.

pub mod error;
pub mod meal;
pub mod meal_service;
pub mod metrics;
pub mod ports;
pub mod registration_service;
pub mod session_service;
pub mod trace_id;
pub mod user;

pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::meal::{Meal, MealDraft, MealId, MealName, MealPatch, MealValidationError};
pub use self::meal_service::MealService;
pub use self::metrics::DietMetrics;
pub use self::registration_service::RegistrationService;
pub use self::session_service::SessionService;
pub use self::trace_id::{TraceId, TRACE_ID_HEADER};
pub use self::user::{Email, SessionToken, User, UserId, UserName, UserValidationError};

/// Convenient result alias for domain operations.
pub type ApiResult<T> = Result<T, Error>;
