//! Test helpers for inbound HTTP components.

use std::sync::Mutex;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{MealRegistry, RegistrationRequest, UserRegistry};
use crate::domain::{
    DietMetrics, Error, Meal, MealDraft, MealId, MealPatch, SessionToken, User, UserId,
};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

#[derive(Default)]
struct RecordingState {
    registrations: Vec<RegistrationRequest>,
    failure: Option<Error>,
}

/// In-memory [`UserRegistry`] capturing registrations for assertions.
#[derive(Default)]
pub struct RecordingUserRegistry {
    state: Mutex<RecordingState>,
}

impl RecordingUserRegistry {
    /// Registrations accepted so far.
    pub fn registrations(&self) -> Vec<RegistrationRequest> {
        self.state.lock().expect("state lock").registrations.clone()
    }

    /// Make the next `register` call fail with `error`.
    pub fn fail_with(&self, error: Error) {
        self.state.lock().expect("state lock").failure = Some(error);
    }
}

#[async_trait]
impl UserRegistry for RecordingUserRegistry {
    async fn register(&self, request: RegistrationRequest) -> Result<(), Error> {
        let mut state = self.state.lock().expect("state lock");
        if let Some(failure) = state.failure.clone() {
            return Err(failure);
        }
        state.registrations.push(request);
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, Error> {
        let state = self.state.lock().expect("state lock");
        Ok(state
            .registrations
            .iter()
            .map(|request| {
                User::new(
                    UserId::random(),
                    request.name.clone(),
                    request.email.clone(),
                    request.session,
                    Utc::now(),
                )
            })
            .collect())
    }
}

/// [`MealRegistry`] stub for handler tests that must fail before reaching it.
pub struct UnreachableMealRegistry;

fn not_wired() -> Error {
    Error::internal("meal registry not wired in this test")
}

#[async_trait]
impl MealRegistry for UnreachableMealRegistry {
    async fn create_meal(&self, _session: &SessionToken, _draft: MealDraft) -> Result<Meal, Error> {
        Err(not_wired())
    }

    async fn list_meals(&self, _session: &SessionToken) -> Result<Vec<Meal>, Error> {
        Err(not_wired())
    }

    async fn get_meal(&self, _session: &SessionToken, _id: &MealId) -> Result<Meal, Error> {
        Err(not_wired())
    }

    async fn update_meal(
        &self,
        _session: &SessionToken,
        _id: &MealId,
        _patch: MealPatch,
    ) -> Result<(), Error> {
        Err(not_wired())
    }

    async fn delete_meal(&self, _session: &SessionToken, _id: &MealId) -> Result<(), Error> {
        Err(not_wired())
    }

    async fn diet_metrics(&self, _session: &SessionToken) -> Result<DietMetrics, Error> {
        Err(not_wired())
    }
}
