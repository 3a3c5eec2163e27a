//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{MealRegistry, UserRegistry};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: Arc<dyn UserRegistry>,
    pub meals: Arc<dyn MealRegistry>,
}

impl HttpState {
    /// Construct state from the driving ports.
    pub fn new(users: Arc<dyn UserRegistry>, meals: Arc<dyn MealRegistry>) -> Self {
        Self { users, meals }
    }
}
