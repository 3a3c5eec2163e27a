//! Domain ports defining the edges of the hexagon.
//!
//! Driving ports (`UserRegistry`, `MealRegistry`, `SessionAuthenticator`) are
//! what inbound adapters call; driven ports (`UserRepository`,
//! `MealRepository`) are what the domain expects from persistence adapters.
//! Driven ports expose strongly typed errors so adapters map their failures
//! into predictable variants instead of returning `anyhow::Result`.

mod meal_registry;
mod meal_repository;
mod session_authenticator;
mod user_registry;
mod user_repository;

pub use meal_registry::MealRegistry;
#[cfg(test)]
pub use meal_repository::MockMealRepository;
pub use meal_repository::{MealPersistenceError, MealRepository};
pub use session_authenticator::SessionAuthenticator;
pub use user_registry::{RegistrationRequest, UserRegistry};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
