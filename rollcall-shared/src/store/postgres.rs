/// PostgreSQL implementation of [`SchoolStore`]
///
/// Two-row inserts run inside one transaction. The sqlx `Transaction` rolls
/// back when dropped, so any `?` between `begin()` and `commit()` leaves no
/// rows behind.
///
/// Constraint violations are mapped by constraint name (see the initial
/// migration) so callers get a typed [`StoreError`] instead of a raw
/// database error.
///
/// # Example
///
/// ```no_run
/// use rollcall_shared::store::{PgStore, SchoolStore};
/// use sqlx::PgPool;
///
/// # async fn example(pool: PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let store = PgStore::new(pool);
/// store.ping().await?;
/// let teachers = store.list_teachers().await?;
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use super::{Reference, SchoolStore, StoreError, StoreResult, UniqueKey};
use crate::db::pool::health_check;
use crate::models::account::{Account, NewAccount};
use crate::models::profile::{Profile, ProfileFields};
use crate::models::student::{NewStudent, Student, StudentView};
use crate::models::teacher::{NewTeacher, Teacher, TeacherView};

const ACCOUNTS_EMAIL_KEY: &str = "accounts_email_key";
const TEACHERS_EMPLOYEE_ID_KEY: &str = "teachers_employee_id_key";
const STUDENTS_ROLL_NUMBER_KEY: &str = "students_roll_number_key";
const STUDENTS_TEACHER_ID_FKEY: &str = "students_teacher_id_fkey";
const STUDENT_PROFILES_STUDENT_ID_FKEY: &str = "student_profiles_student_id_fkey";

/// Store backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Maps a sqlx error onto the store's error vocabulary
fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        let constraint = db_err.constraint().unwrap_or_default();

        if db_err.is_unique_violation() {
            match constraint {
                ACCOUNTS_EMAIL_KEY => return StoreError::UniqueViolation(UniqueKey::Email),
                TEACHERS_EMPLOYEE_ID_KEY => {
                    return StoreError::UniqueViolation(UniqueKey::EmployeeId)
                }
                STUDENTS_ROLL_NUMBER_KEY => {
                    return StoreError::UniqueViolation(UniqueKey::RollNumber)
                }
                _ => {}
            }
        }

        if db_err.is_foreign_key_violation() {
            match constraint {
                STUDENTS_TEACHER_ID_FKEY => {
                    return StoreError::MissingReference(Reference::Teacher)
                }
                STUDENT_PROFILES_STUDENT_ID_FKEY => {
                    return StoreError::MissingReference(Reference::Student)
                }
                _ => {}
            }
        }
    }

    StoreError::Backend(err.to_string())
}

#[async_trait]
impl SchoolStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        health_check(&self.pool).await.map_err(map_sqlx_error)
    }

    async fn find_account_by_id(&self, id: Uuid) -> StoreResult<Option<Account>> {
        Account::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)
    }

    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        Account::find_by_email(&self.pool, email)
            .await
            .map_err(map_sqlx_error)
    }

    async fn email_taken(&self, email: &str) -> StoreResult<bool> {
        Account::email_exists(&self.pool, email)
            .await
            .map_err(map_sqlx_error)
    }

    async fn employee_id_taken(&self, employee_id: &str) -> StoreResult<bool> {
        Teacher::employee_id_exists(&self.pool, employee_id)
            .await
            .map_err(map_sqlx_error)
    }

    async fn roll_number_taken(&self, roll_number: &str) -> StoreResult<bool> {
        Student::roll_number_exists(&self.pool, roll_number)
            .await
            .map_err(map_sqlx_error)
    }

    async fn create_principal(&self, account: NewAccount) -> StoreResult<Account> {
        Account::create(&self.pool, &account)
            .await
            .map_err(map_sqlx_error)
    }

    async fn create_teacher(
        &self,
        account: NewAccount,
        teacher: NewTeacher,
    ) -> StoreResult<TeacherView> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let account = Account::create(&mut *tx, &account)
            .await
            .map_err(map_sqlx_error)?;
        let teacher = Teacher::create(&mut *tx, account.id, &teacher)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        debug!(teacher_id = %teacher.id, account_id = %account.id, "Inserted teacher");

        Ok(TeacherView {
            id: teacher.id,
            name: teacher.name,
            employee_id: teacher.employee_id,
            email: account.email,
        })
    }

    async fn create_student(
        &self,
        account: NewAccount,
        student: NewStudent,
    ) -> StoreResult<StudentView> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let account = Account::create(&mut *tx, &account)
            .await
            .map_err(map_sqlx_error)?;
        let student = Student::create(&mut *tx, account.id, &student)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        debug!(student_id = %student.id, account_id = %account.id, "Inserted student");

        Ok(StudentView {
            id: student.id,
            name: student.name,
            roll_number: student.roll_number,
            email: account.email,
            teacher_id: student.teacher_id,
        })
    }

    async fn find_teacher(&self, id: Uuid) -> StoreResult<Option<Teacher>> {
        Teacher::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)
    }

    async fn find_teacher_by_account(&self, account_id: Uuid) -> StoreResult<Option<Teacher>> {
        Teacher::find_by_account_id(&self.pool, account_id)
            .await
            .map_err(map_sqlx_error)
    }

    async fn find_teacher_view(&self, id: Uuid) -> StoreResult<Option<TeacherView>> {
        TeacherView::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)
    }

    async fn find_student(&self, id: Uuid) -> StoreResult<Option<Student>> {
        Student::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)
    }

    async fn find_student_by_account(&self, account_id: Uuid) -> StoreResult<Option<Student>> {
        Student::find_by_account_id(&self.pool, account_id)
            .await
            .map_err(map_sqlx_error)
    }

    async fn find_student_view(&self, id: Uuid) -> StoreResult<Option<StudentView>> {
        StudentView::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)
    }

    async fn list_teachers(&self) -> StoreResult<Vec<TeacherView>> {
        TeacherView::list(&self.pool).await.map_err(map_sqlx_error)
    }

    async fn list_student_views(&self, teacher_id: Uuid) -> StoreResult<Vec<StudentView>> {
        StudentView::list_by_teacher(&self.pool, teacher_id)
            .await
            .map_err(map_sqlx_error)
    }

    async fn find_profile(&self, student_id: Uuid) -> StoreResult<Option<Profile>> {
        Profile::find_by_student_id(&self.pool, student_id)
            .await
            .map_err(map_sqlx_error)
    }

    async fn list_profiles_for_teacher(&self, teacher_id: Uuid) -> StoreResult<Vec<Profile>> {
        Profile::list_by_teacher(&self.pool, teacher_id)
            .await
            .map_err(map_sqlx_error)
    }

    async fn upsert_profile(
        &self,
        student_id: Uuid,
        fields: &ProfileFields,
    ) -> StoreResult<Profile> {
        Profile::upsert(&self.pool, student_id, fields)
            .await
            .map_err(map_sqlx_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_backend() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::RowNotFound),
            StoreError::Backend(_)
        ));
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolTimedOut),
            StoreError::Backend(_)
        ));
    }
}
