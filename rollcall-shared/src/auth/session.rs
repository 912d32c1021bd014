/// Caller identity resolved for a request
///
/// The HTTP layer turns an optional bearer token into a [`Session`]. An
/// anonymous session is not an error at this point: the access control guard
/// decides, per operation, that a missing caller means `UNAUTHENTICATED`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::jwt::{validate_token, Claims, JwtError};
use crate::models::account::Role;

/// An authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    /// Account the request acts as
    pub account_id: Uuid,

    /// Role of that account
    pub role: Role,
}

impl Caller {
    pub fn new(account_id: Uuid, role: Role) -> Self {
        Self { account_id, role }
    }
}

impl From<&Claims> for Caller {
    fn from(claims: &Claims) -> Self {
        Self::new(claims.sub, claims.role)
    }
}

/// Per-request session: a caller, or nobody
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session(Option<Caller>);

impl Session {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn authenticated(caller: Caller) -> Self {
        Self(Some(caller))
    }

    /// Resolves a session from the value of an `Authorization` header
    ///
    /// A missing header yields an anonymous session. A header that is present
    /// but is not a valid `Bearer` token is an error: the client tried to
    /// authenticate and failed.
    ///
    /// # Example
    ///
    /// ```
    /// use rollcall_shared::auth::session::Session;
    ///
    /// let session = Session::from_authorization(None, "secret").unwrap();
    /// assert!(session.caller().is_none());
    /// ```
    pub fn from_authorization(header: Option<&str>, secret: &str) -> Result<Self, JwtError> {
        let Some(header) = header else {
            return Ok(Self::anonymous());
        };

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| JwtError::ValidationError("Expected Bearer token".to_string()))?;

        let claims = validate_token(token.trim(), secret)?;
        Ok(Self::authenticated(Caller::from(&claims)))
    }

    pub fn caller(&self) -> Option<&Caller> {
        self.0.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::{create_token, default_ttl};

    const SECRET: &str = "test-secret-key-at-least-32-bytes-long";

    #[test]
    fn test_missing_header_is_anonymous() {
        let session = Session::from_authorization(None, SECRET).unwrap();
        assert_eq!(session, Session::anonymous());
    }

    #[test]
    fn test_bearer_token_resolves_caller() {
        let account_id = Uuid::new_v4();
        let token = create_token(&Claims::new(account_id, Role::Teacher, default_ttl()), SECRET)
            .unwrap();

        let header = format!("Bearer {}", token);
        let session = Session::from_authorization(Some(&header), SECRET).unwrap();

        assert_eq!(
            session.caller(),
            Some(&Caller::new(account_id, Role::Teacher))
        );
    }

    #[test]
    fn test_non_bearer_header_is_rejected() {
        assert!(Session::from_authorization(Some("Basic abc"), SECRET).is_err());
        assert!(Session::from_authorization(Some("Bearer nope"), SECRET).is_err());
    }
}
