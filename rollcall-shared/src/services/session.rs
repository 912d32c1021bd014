/// Login and current-session lookup
///
/// Token issuance lives in the HTTP layer, which owns the signing secret.
/// This module only checks credentials and describes the caller.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::{SchoolService, ServiceError, ServiceResult};
use crate::auth::authorization::AuthzError;
use crate::auth::session::Caller;
use crate::models::account::{normalize_email, Account, Role};

/// Who the current caller is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub account_id: Uuid,
    pub email: String,
    pub role: Role,
}

impl SchoolService {
    /// Checks an email/password pair and returns the account
    ///
    /// An unknown email and a wrong password produce the same error.
    pub async fn authenticate(&self, email: &str, password: &str) -> ServiceResult<Account> {
        let email = normalize_email(email);

        let Some(account) = self.store.find_account_by_email(&email).await? else {
            warn!(email = %email, "Login failed: unknown email");
            return Err(ServiceError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &account.password_hash)? {
            warn!(account_id = %account.id, "Login failed: wrong password");
            return Err(ServiceError::InvalidCredentials);
        }

        info!(account_id = %account.id, role = %account.role, "Login succeeded");
        Ok(account)
    }

    /// Describes the calling account
    ///
    /// # Errors
    ///
    /// `UNAUTHENTICATED` without a caller, or when the token names an account
    /// that no longer exists.
    pub async fn current_session(&self, caller: Option<&Caller>) -> ServiceResult<SessionView> {
        let caller = caller.ok_or(AuthzError::Unauthenticated)?;

        let account = self
            .store
            .find_account_by_id(caller.account_id)
            .await?
            .ok_or(AuthzError::Unauthenticated)?;

        Ok(SessionView {
            account_id: account.id,
            email: account.email,
            role: account.role,
        })
    }
}
