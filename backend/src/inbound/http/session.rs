//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations on the opaque session token.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, SessionToken};

pub(crate) const SESSION_TOKEN_KEY: &str = "session_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the opaque session token in the session cookie.
    pub fn persist_token(&self, token: &SessionToken) -> Result<(), Error> {
        self.0
            .insert(SESSION_TOKEN_KEY, token.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current session token, if present.
    ///
    /// A stored value that fails validation is treated as absent rather than
    /// surfacing a distinct error to the client.
    pub fn token(&self) -> Result<Option<SessionToken>, Error> {
        let raw = self
            .0
            .get::<String>(SESSION_TOKEN_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match raw {
            Some(raw) => match SessionToken::new(raw) {
                Ok(token) => Ok(Some(token)),
                Err(error) => {
                    tracing::warn!("invalid session token in cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require a session token or return `401 Unauthorized`.
    pub fn require_token(&self) -> Result<SessionToken, Error> {
        self.token()?
            .ok_or_else(|| Error::unauthorized("session required"))
    }

    /// Return the existing token, issuing and persisting a fresh one when the
    /// request carries none.
    pub fn token_or_issue(&self) -> Result<SessionToken, Error> {
        if let Some(token) = self.token()? {
            return Ok(token);
        }
        let token = SessionToken::generate();
        self.persist_token(&token)?;
        Ok(token)
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
