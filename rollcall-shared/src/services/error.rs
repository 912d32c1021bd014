/// Domain errors returned by service operations
///
/// Every failure a client can observe maps to one stable reason code
/// ([`ErrorKind::code`]). The HTTP layer picks the status from the kind and
/// uses the code as the `error` field of the response body.

use std::fmt;

use crate::auth::authorization::AuthzError;
use crate::auth::password::PasswordError;
use crate::store::{Reference, StoreError, UniqueKey};

/// Error type for service operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Access control refused the operation
    #[error(transparent)]
    Authz(#[from] AuthzError),

    /// Input failed validation; `fields` names the offending inputs
    #[error("{message}")]
    Validation {
        message: String,
        fields: Vec<String>,
    },

    #[error("User with this email already exists")]
    EmailTaken,

    #[error("Teacher with this employee ID already exists")]
    EmployeeIdTaken,

    #[error("Student with this roll number already exists")]
    RollNumberTaken,

    #[error("Teacher record not found")]
    TeacherNotFound,

    #[error("Student not found")]
    StudentNotFound,

    /// Login with an unknown email or a wrong password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Store or hasher failure; details are logged, not returned
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Client-facing classification of a [`ServiceError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Unauthenticated,
    ForbiddenRole,
    ForbiddenRelationship,
    Validation,
    ConflictEmail,
    ConflictEmployeeId,
    ConflictRollNumber,
    NotFoundTeacher,
    NotFoundStudent,
    Internal,
}

impl ErrorKind {
    /// Stable reason code
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Unauthenticated => "UNAUTHENTICATED",
            ErrorKind::ForbiddenRole => "FORBIDDEN_ROLE",
            ErrorKind::ForbiddenRelationship => "FORBIDDEN_RELATIONSHIP",
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::ConflictEmail => "CONFLICT_EMAIL",
            ErrorKind::ConflictEmployeeId => "CONFLICT_EMPLOYEE_ID",
            ErrorKind::ConflictRollNumber => "CONFLICT_ROLL_NUMBER",
            ErrorKind::NotFoundTeacher => "NOT_FOUND_TEACHER",
            ErrorKind::NotFoundStudent => "NOT_FOUND_STUDENT",
            ErrorKind::Internal => "INTERNAL",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl ServiceError {
    /// Builds a validation error
    pub fn validation(message: impl Into<String>, fields: Vec<String>) -> Self {
        ServiceError::Validation {
            message: message.into(),
            fields,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Authz(AuthzError::Unauthenticated) => ErrorKind::Unauthenticated,
            ServiceError::Authz(AuthzError::ForbiddenRole { .. }) => ErrorKind::ForbiddenRole,
            ServiceError::Authz(AuthzError::ForbiddenRelationship) => {
                ErrorKind::ForbiddenRelationship
            }
            ServiceError::Validation { .. } => ErrorKind::Validation,
            ServiceError::EmailTaken => ErrorKind::ConflictEmail,
            ServiceError::EmployeeIdTaken => ErrorKind::ConflictEmployeeId,
            ServiceError::RollNumberTaken => ErrorKind::ConflictRollNumber,
            ServiceError::TeacherNotFound => ErrorKind::NotFoundTeacher,
            ServiceError::StudentNotFound => ErrorKind::NotFoundStudent,
            ServiceError::InvalidCredentials => ErrorKind::Unauthenticated,
            ServiceError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Offending input fields, empty unless this is a validation error
    pub fn fields(&self) -> &[String] {
        match self {
            ServiceError::Validation { fields, .. } => fields,
            _ => &[],
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(UniqueKey::Email) => ServiceError::EmailTaken,
            StoreError::UniqueViolation(UniqueKey::EmployeeId) => ServiceError::EmployeeIdTaken,
            StoreError::UniqueViolation(UniqueKey::RollNumber) => ServiceError::RollNumberTaken,
            StoreError::MissingReference(Reference::Teacher) => ServiceError::TeacherNotFound,
            StoreError::MissingReference(Reference::Student) => ServiceError::StudentNotFound,
            StoreError::Backend(msg) => ServiceError::Internal(msg),
        }
    }
}

impl From<PasswordError> for ServiceError {
    fn from(err: PasswordError) -> Self {
        ServiceError::Internal(err.to_string())
    }
}

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;
