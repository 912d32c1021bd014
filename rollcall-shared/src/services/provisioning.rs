/// Account provisioning
///
/// Principals create teacher and student accounts. Each creation checks, in
/// order:
///
/// 1. Access control (principal only)
/// 2. Presence of every field (non-empty after trimming), reporting all
///    missing fields at once
/// 3. Email syntax
/// 4. Uniqueness: email, then employee ID or roll number
/// 5. For students, that the assigned teacher exists
///
/// The account and its teacher/student row are then inserted atomically. The
/// uniqueness checks are a fast path only: a conflict the store reports at
/// insert time maps to the same error.
///
/// # Example
///
/// ```no_run
/// use rollcall_shared::services::SchoolService;
/// use rollcall_shared::services::provisioning::CreateTeacherInput;
/// use rollcall_shared::auth::session::Caller;
///
/// # async fn example(service: SchoolService, principal: Caller) -> Result<(), Box<dyn std::error::Error>> {
/// let teacher = service
///     .create_teacher(
///         Some(&principal),
///         CreateTeacherInput {
///             email: Some("ada@school.org".to_string()),
///             password: Some("chalkboard".to_string()),
///             name: Some("Ada Lovelace".to_string()),
///             employee_id: Some("EMP-001".to_string()),
///         },
///     )
///     .await?;
/// println!("Created teacher {}", teacher.id);
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;
use validator::ValidateEmail;

use super::{SchoolService, ServiceError, ServiceResult};
use crate::auth::authorization::{authorize, Action};
use crate::auth::session::Caller;
use crate::models::account::{normalize_email, Account, NewAccount, Role};
use crate::models::student::{NewStudent, StudentView};
use crate::models::teacher::{NewTeacher, TeacherView};

/// Input for creating a teacher
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTeacherInput {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub employee_id: Option<String>,
}

/// Input for creating a student
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateStudentInput {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub roll_number: Option<String>,
    #[serde(default)]
    pub teacher_id: Option<Uuid>,
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// Fails with every missing field listed
fn require_present(fields: &[(&'static str, bool)]) -> ServiceResult<()> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::validation(
            format!("Missing required fields: {}", missing.join(", ")),
            missing,
        ))
    }
}

/// Normalizes and syntax-checks an email address
fn checked_email(raw: &str) -> ServiceResult<String> {
    let email = normalize_email(raw);
    if !email.validate_email() {
        return Err(ServiceError::validation(
            "Invalid email address",
            vec!["email".to_string()],
        ));
    }
    Ok(email)
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

impl SchoolService {
    /// Creates a teacher account
    ///
    /// # Errors
    ///
    /// - `UNAUTHENTICATED` / `FORBIDDEN_ROLE` unless called by a principal
    /// - `VALIDATION_ERROR` for missing fields or a malformed email
    /// - `CONFLICT_EMAIL`, `CONFLICT_EMPLOYEE_ID`
    pub async fn create_teacher(
        &self,
        caller: Option<&Caller>,
        input: CreateTeacherInput,
    ) -> ServiceResult<TeacherView> {
        let caller = authorize(caller, Action::CreateTeacher, None)?;

        require_present(&[
            ("email", is_present(&input.email)),
            ("password", is_present(&input.password)),
            ("name", is_present(&input.name)),
            ("employee_id", is_present(&input.employee_id)),
        ])?;

        let email = checked_email(input.email.as_deref().unwrap_or_default())?;
        let employee_id = trimmed(input.employee_id);

        if self.store.email_taken(&email).await? {
            warn!(email = %email, "Teacher creation rejected: email taken");
            return Err(ServiceError::EmailTaken);
        }
        if self.store.employee_id_taken(&employee_id).await? {
            warn!(employee_id = %employee_id, "Teacher creation rejected: employee ID taken");
            return Err(ServiceError::EmployeeIdTaken);
        }

        let password_hash = self.hasher.hash(input.password.as_deref().unwrap_or_default())?;

        let teacher = self
            .store
            .create_teacher(
                NewAccount {
                    email,
                    password_hash,
                    role: Role::Teacher,
                },
                NewTeacher {
                    name: trimmed(input.name),
                    employee_id,
                },
            )
            .await?;

        info!(
            teacher_id = %teacher.id,
            employee_id = %teacher.employee_id,
            created_by = %caller.account_id,
            "Teacher created"
        );

        Ok(teacher)
    }

    /// Creates a student account assigned to an existing teacher
    ///
    /// # Errors
    ///
    /// - `UNAUTHENTICATED` / `FORBIDDEN_ROLE` unless called by a principal
    /// - `VALIDATION_ERROR` for missing fields or a malformed email
    /// - `CONFLICT_EMAIL`, `CONFLICT_ROLL_NUMBER`
    /// - `NOT_FOUND_TEACHER` when `teacher_id` names no teacher
    pub async fn create_student(
        &self,
        caller: Option<&Caller>,
        input: CreateStudentInput,
    ) -> ServiceResult<StudentView> {
        let caller = authorize(caller, Action::CreateStudent, None)?;

        require_present(&[
            ("email", is_present(&input.email)),
            ("password", is_present(&input.password)),
            ("name", is_present(&input.name)),
            ("roll_number", is_present(&input.roll_number)),
            ("teacher_id", input.teacher_id.is_some()),
        ])?;

        let email = checked_email(input.email.as_deref().unwrap_or_default())?;
        let roll_number = trimmed(input.roll_number);
        let teacher_id = input.teacher_id.unwrap_or_default();

        if self.store.email_taken(&email).await? {
            warn!(email = %email, "Student creation rejected: email taken");
            return Err(ServiceError::EmailTaken);
        }
        if self.store.roll_number_taken(&roll_number).await? {
            warn!(roll_number = %roll_number, "Student creation rejected: roll number taken");
            return Err(ServiceError::RollNumberTaken);
        }
        if self.store.find_teacher(teacher_id).await?.is_none() {
            warn!(teacher_id = %teacher_id, "Student creation rejected: unknown teacher");
            return Err(ServiceError::TeacherNotFound);
        }

        let password_hash = self.hasher.hash(input.password.as_deref().unwrap_or_default())?;

        let student = self
            .store
            .create_student(
                NewAccount {
                    email,
                    password_hash,
                    role: Role::Student,
                },
                NewStudent {
                    name: trimmed(input.name),
                    roll_number,
                    teacher_id,
                },
            )
            .await?;

        info!(
            student_id = %student.id,
            roll_number = %student.roll_number,
            teacher_id = %student.teacher_id,
            created_by = %caller.account_id,
            "Student created"
        );

        Ok(student)
    }

    /// Creates the principal account if it does not exist yet
    ///
    /// Accounts can only be created by a principal, so the first one comes
    /// from configuration at startup. Returns `Some` when an account was
    /// created and `None` when the email was already registered, in which
    /// case the existing account is left untouched.
    ///
    /// # Errors
    ///
    /// `VALIDATION_ERROR` for a blank password or malformed email.
    pub async fn bootstrap_principal(
        &self,
        email: &str,
        password: &str,
    ) -> ServiceResult<Option<Account>> {
        require_present(&[
            ("email", !email.trim().is_empty()),
            ("password", !password.trim().is_empty()),
        ])?;
        let email = checked_email(email)?;

        if let Some(existing) = self.store.find_account_by_email(&email).await? {
            if existing.role != Role::Principal {
                warn!(
                    email = %email,
                    role = %existing.role,
                    "Configured principal email belongs to a non-principal account"
                );
            } else {
                info!(account_id = %existing.id, "Principal account already present");
            }
            return Ok(None);
        }

        let password_hash = self.hasher.hash(password)?;
        let account = match self
            .store
            .create_principal(NewAccount {
                email,
                password_hash,
                role: Role::Principal,
            })
            .await
        {
            Ok(account) => account,
            // Another instance bootstrapped concurrently
            Err(crate::store::StoreError::UniqueViolation(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        info!(account_id = %account.id, email = %account.email, "Principal account created");
        Ok(Some(account))
    }
}
