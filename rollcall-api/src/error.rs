/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>`, which converts to the right
/// status code and a body of the form:
///
/// ```json
/// {
///   "error": "CONFLICT_EMAIL",
///   "message": "User with this email already exists"
/// }
/// ```
///
/// `error` is always one of the stable reason codes from
/// [`rollcall_shared::services::ErrorKind::code`]; validation failures add a
/// `details` list naming the offending fields.
///
/// # Example
///
/// ```no_run
/// use rollcall_api::error::{ApiError, ApiResult};
/// use axum::Json;
///
/// async fn handler() -> ApiResult<Json<serde_json::Value>> {
///     Err(ApiError::BadRequest("Expected a JSON body".to_string()))
/// }
/// ```

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rollcall_shared::auth::jwt::JwtError;
use rollcall_shared::services::{ErrorKind, ServiceError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request (400, `VALIDATION_ERROR`)
    BadRequest(String),

    /// Missing or invalid credentials (401, `UNAUTHENTICATED`)
    Unauthorized(String),

    /// Request body failed validation (400, `VALIDATION_ERROR`)
    ValidationError(Vec<ValidationErrorDetail>),

    /// Failure reported by a service operation; status follows its kind
    Service(ServiceError),

    /// Internal server error (500, `INTERNAL`)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Reason code (e.g., "UNAUTHENTICATED", "CONFLICT_EMAIL")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::ValidationError(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Service(err) => write!(f, "{}: {}", err.kind(), err),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// HTTP status for a service error kind
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
        ErrorKind::ForbiddenRole | ErrorKind::ForbiddenRelationship => StatusCode::FORBIDDEN,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::ConflictEmail | ErrorKind::ConflictEmployeeId | ErrorKind::ConflictRollNumber => {
            StatusCode::CONFLICT
        }
        ErrorKind::NotFoundTeacher | ErrorKind::NotFoundStudent => StatusCode::NOT_FOUND,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn internal_response(msg: &str) -> (StatusCode, &'static str, String, Option<Vec<ValidationErrorDetail>>) {
    // Log internal errors but don't expose details to clients
    tracing::error!("Internal error: {}", msg);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::Internal.code(),
        "An internal error occurred".to_string(),
        None,
    )
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorKind::Validation.code(),
                msg,
                None,
            ),
            ApiError::Unauthorized(msg) => (
                StatusCode::UNAUTHORIZED,
                ErrorKind::Unauthenticated.code(),
                msg,
                None,
            ),
            ApiError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorKind::Validation.code(),
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::Service(ServiceError::Internal(msg)) => internal_response(&msg),
            ApiError::Service(err) => {
                let kind = err.kind();
                let details = (!err.fields().is_empty()).then(|| {
                    err.fields()
                        .iter()
                        .map(|field| ValidationErrorDetail {
                            field: field.clone(),
                            message: err.to_string(),
                        })
                        .collect()
                });
                (status_for(kind), kind.code(), err.to_string(), details)
            }
            ApiError::InternalError(msg) => internal_response(&msg),
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::Service(err)
    }
}

/// Malformed or mistyped JSON bodies are validation errors
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Path parameters that fail to parse (e.g. a non-UUID id)
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Field errors from `validator`, one detail per failed rule
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();
        details.sort_by(|a, b| a.field.cmp(&b.field));
        ApiError::ValidationError(details)
    }
}

/// Convert JWT errors to API errors
impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Expired => ApiError::Unauthorized("Token expired".to_string()),
            JwtError::InvalidIssuer => {
                ApiError::Unauthorized("Invalid token issuer".to_string())
            }
            JwtError::CreateError(msg) => ApiError::InternalError(msg),
            JwtError::ValidationError(_) => ApiError::Unauthorized(format!("Invalid token: {}", err)),
        }
    }
}
