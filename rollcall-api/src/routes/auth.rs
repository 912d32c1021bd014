/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /v1/auth/login` - Exchange email and password for a bearer token
/// - `GET /v1/auth/session` - Describe the calling account

use crate::{app::AppState, error::ApiResult};
use axum::{extract::rejection::JsonRejection, extract::State, Extension, Json};
use rollcall_shared::{
    auth::{jwt, session::Session},
    models::account::{normalize_email, Role},
    services::session::SessionView,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl LoginRequest {
    /// Normalizes the email the same way account creation does, so a padded
    /// or mixed-case address validates identically in both places
    pub fn normalized(self) -> Self {
        Self {
            email: normalize_email(&self.email),
            password: self.password,
        }
    }
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Signed session token
    pub access_token: String,

    /// Always `Bearer`
    pub token_type: String,

    /// Seconds until the token expires
    pub expires_in: i64,

    /// Role of the authenticated account
    pub role: Role,
}

/// Login endpoint
///
/// # Endpoint
///
/// ```text
/// POST /v1/auth/login
/// Content-Type: application/json
///
/// {
///   "email": "principal@school.org",
///   "password": "s3cret"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "access_token": "eyJ...",
///   "token_type": "Bearer",
///   "expires_in": 86400,
///   "role": "PRINCIPAL"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Invalid credentials
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(req) = body?;
    let req = req.normalized();
    req.validate()?;

    let account = state.school.authenticate(&req.email, &req.password).await?;

    let ttl = state.config.jwt_ttl();
    let claims = jwt::Claims::new(account.id, account.role, ttl);
    let access_token = jwt::create_token(&claims, state.jwt_secret())?;

    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: ttl.num_seconds(),
        role: account.role,
    }))
}

/// Current session endpoint
///
/// ```text
/// GET /v1/auth/session
/// Authorization: Bearer eyJ...
/// ```
///
/// Returns `{account_id, email, role}`, or `401` without a valid token.
pub async fn session(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<SessionView>> {
    let view = state.school.current_session(session.caller()).await?;
    Ok(Json(view))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_validation() {
        let ok = LoginRequest {
            email: "a@school.org".to_string(),
            password: "pw".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = LoginRequest {
            email: "not-an-email".to_string(),
            password: String::new(),
        };
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_padded_email_validates_after_normalizing() {
        let req = LoginRequest {
            email: " Ada@School.org ".to_string(),
            password: "pw".to_string(),
        }
        .normalized();

        assert_eq!(req.email, "ada@school.org");
        assert!(req.validate().is_ok());
    }
}
