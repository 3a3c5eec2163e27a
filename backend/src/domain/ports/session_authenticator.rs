//! Driving port resolving a session credential to its owning user.
//!
//! The token is a bearer credential with no signing or server-side expiry;
//! keeping resolution behind this trait means a stronger scheme can replace
//! it without touching call sites.

use async_trait::async_trait;

use crate::domain::{Error, SessionToken, User};

/// Domain use-case port for session resolution.
#[async_trait]
pub trait SessionAuthenticator: Send + Sync {
    /// Resolve `token` to the user it was issued to.
    ///
    /// `Ok(None)` means the token matches no registered user. Callers treat
    /// that as "operations match zero records" rather than a distinct error.
    async fn resolve(&self, token: &SessionToken) -> Result<Option<User>, Error>;
}
