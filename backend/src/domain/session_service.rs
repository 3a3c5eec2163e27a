//! Session resolution service backed by the user repository.
//!
//! The credential check is a verbatim match of the presented token against
//! the `session_id` stored at registration. A token that matches nothing is
//! not an error here; callers decide what "no user" means for them.

use std::sync::Arc;

use async_trait::async_trait;

use super::ports::{SessionAuthenticator, UserPersistenceError, UserRepository};
use super::{Error, SessionToken, User};

/// [`SessionAuthenticator`] implementation resolving tokens via user lookups.
#[derive(Clone)]
pub struct SessionService {
    users: Arc<dyn UserRepository>,
}

impl SessionService {
    /// Create a new resolver backed by the given repository.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => Error::service_unavailable(message),
        UserPersistenceError::Query { message } | UserPersistenceError::Duplicate { message } => {
            Error::internal(message)
        }
    }
}

#[async_trait]
impl SessionAuthenticator for SessionService {
    async fn resolve(&self, token: &SessionToken) -> Result<Option<User>, Error> {
        self.users
            .find_by_session(token)
            .await
            .map_err(map_persistence_error)
    }
}
