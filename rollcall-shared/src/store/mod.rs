/// Persistence seam for the school domain
///
/// Services never talk to a database directly. They go through the
/// [`SchoolStore`] trait, which has two implementations:
///
/// - [`PgStore`]: PostgreSQL via sqlx, used by the server
/// - [`MemoryStore`]: in-process maps behind a lock, used by tests and demos
///
/// # Store Contract
///
/// Every implementation must:
/// 1. Enforce uniqueness of account email, teacher employee ID and student
///    roll number, reporting a violation as [`StoreError::UniqueViolation`]
/// 2. Reject a student whose teacher does not exist, or a profile whose
///    student does not exist, as [`StoreError::MissingReference`]
/// 3. Create an account together with its teacher/student row atomically:
///    both rows or neither
/// 4. Upsert profiles keyed on the student ID, never producing two rows
///
/// The `*_taken` lookups are advisory. Services use them to report conflicts
/// in a fixed order, but the inserts must still enforce the constraints
/// themselves since another request can win the race in between.

use async_trait::async_trait;
use std::fmt;
use uuid::Uuid;

use crate::models::account::{Account, NewAccount};
use crate::models::profile::{Profile, ProfileFields};
use crate::models::student::{NewStudent, Student, StudentView};
use crate::models::teacher::{NewTeacher, Teacher, TeacherView};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Uniquely constrained keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKey {
    Email,
    EmployeeId,
    RollNumber,
}

impl fmt::Display for UniqueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueKey::Email => write!(f, "email"),
            UniqueKey::EmployeeId => write!(f, "employee_id"),
            UniqueKey::RollNumber => write!(f, "roll_number"),
        }
    }
}

/// Rows another row must point at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference {
    Teacher,
    Student,
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reference::Teacher => write!(f, "teacher"),
            Reference::Student => write!(f, "student"),
        }
    }
}

/// Store error types
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("Duplicate {0}")]
    UniqueViolation(UniqueKey),

    /// A foreign key pointed at a row that does not exist
    #[error("Referenced {0} does not exist")]
    MissingReference(Reference),

    /// Connection, query or other backend failure
    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Transactional access to accounts, teachers, students and profiles
#[async_trait]
pub trait SchoolStore: Send + Sync {
    /// Name of the backend, for logs and health output
    fn backend(&self) -> &'static str;

    /// Checks that the backend is reachable
    async fn ping(&self) -> StoreResult<()>;

    async fn find_account_by_id(&self, id: Uuid) -> StoreResult<Option<Account>>;

    /// Looks up an account by normalized email
    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>>;

    async fn email_taken(&self, email: &str) -> StoreResult<bool>;

    async fn employee_id_taken(&self, employee_id: &str) -> StoreResult<bool>;

    async fn roll_number_taken(&self, roll_number: &str) -> StoreResult<bool>;

    /// Inserts a standalone account (the principal)
    async fn create_principal(&self, account: NewAccount) -> StoreResult<Account>;

    /// Inserts an account and its teacher row atomically
    async fn create_teacher(
        &self,
        account: NewAccount,
        teacher: NewTeacher,
    ) -> StoreResult<TeacherView>;

    /// Inserts an account and its student row atomically
    async fn create_student(
        &self,
        account: NewAccount,
        student: NewStudent,
    ) -> StoreResult<StudentView>;

    async fn find_teacher(&self, id: Uuid) -> StoreResult<Option<Teacher>>;

    async fn find_teacher_by_account(&self, account_id: Uuid) -> StoreResult<Option<Teacher>>;

    async fn find_teacher_view(&self, id: Uuid) -> StoreResult<Option<TeacherView>>;

    async fn find_student(&self, id: Uuid) -> StoreResult<Option<Student>>;

    async fn find_student_by_account(&self, account_id: Uuid) -> StoreResult<Option<Student>>;

    async fn find_student_view(&self, id: Uuid) -> StoreResult<Option<StudentView>>;

    /// All teachers, ordered by name
    async fn list_teachers(&self) -> StoreResult<Vec<TeacherView>>;

    /// Students assigned to a teacher, ordered by roll number
    async fn list_student_views(&self, teacher_id: Uuid) -> StoreResult<Vec<StudentView>>;

    async fn find_profile(&self, student_id: Uuid) -> StoreResult<Option<Profile>>;

    /// Existing profiles of every student assigned to a teacher
    async fn list_profiles_for_teacher(&self, teacher_id: Uuid) -> StoreResult<Vec<Profile>>;

    /// Inserts or fully overwrites a student's profile
    async fn upsert_profile(
        &self,
        student_id: Uuid,
        fields: &ProfileFields,
    ) -> StoreResult<Profile>;
}
