//! Driving port for user registration and listing.

use async_trait::async_trait;

use crate::domain::{Email, Error, SessionToken, User, UserName};

/// Validated registration payload.
///
/// The session token is chosen by the inbound adapter: the one already on
/// the request when present, a freshly issued one otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    pub name: UserName,
    pub email: Email,
    pub session: SessionToken,
}

/// Domain use-case port for the user registry.
#[async_trait]
pub trait UserRegistry: Send + Sync {
    /// Register a new user bound to the supplied session token.
    async fn register(&self, request: RegistrationRequest) -> Result<(), Error>;

    /// Return every registered user.
    async fn list_users(&self) -> Result<Vec<User>, Error>;
}
