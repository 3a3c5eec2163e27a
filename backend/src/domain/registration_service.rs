//! User registry service backed by a user repository port.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use super::ports::{RegistrationRequest, UserPersistenceError, UserRegistry, UserRepository};
use super::{Error, User, UserId};

/// [`UserRegistry`] implementation persisting through a [`UserRepository`].
#[derive(Clone)]
pub struct RegistrationService {
    users: Arc<dyn UserRepository>,
}

impl RegistrationService {
    /// Create a new registry backed by the given repository.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } => Error::internal(message),
        UserPersistenceError::Duplicate { .. } => Error::conflict("email already registered"),
    }
}

#[async_trait]
impl UserRegistry for RegistrationService {
    async fn register(&self, request: RegistrationRequest) -> Result<(), Error> {
        let RegistrationRequest {
            name,
            email,
            session,
        } = request;
        let user = User::new(UserId::random(), name, email, session, Utc::now());

        self.users
            .insert(&user)
            .await
            .map_err(map_persistence_error)?;

        info!(user_id = %user.id(), "user registered");
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.users.list().await.map_err(map_persistence_error)
    }
}
