/// In-memory implementation of [`SchoolStore`]
///
/// Used by tests and local demos. All tables live behind one
/// `tokio::sync::RwLock`; every write checks its constraints and inserts
/// while holding the write lock, which gives the same all-or-nothing
/// behavior as a database transaction.
///
/// # Example
///
/// ```
/// use rollcall_shared::store::{MemoryStore, SchoolStore};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// store.ping().await?;
/// assert!(store.list_teachers().await?.is_empty());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Reference, SchoolStore, StoreError, StoreResult, UniqueKey};
use crate::models::account::{Account, NewAccount};
use crate::models::profile::{Profile, ProfileFields};
use crate::models::student::{NewStudent, Student, StudentView};
use crate::models::teacher::{NewTeacher, Teacher, TeacherView};

#[derive(Debug, Default)]
struct Tables {
    accounts: HashMap<Uuid, Account>,
    teachers: HashMap<Uuid, Teacher>,
    students: HashMap<Uuid, Student>,
    profiles: HashMap<Uuid, Profile>,
}

impl Tables {
    fn email_taken(&self, email: &str) -> bool {
        self.accounts.values().any(|a| a.email == email)
    }

    fn employee_id_taken(&self, employee_id: &str) -> bool {
        self.teachers.values().any(|t| t.employee_id == employee_id)
    }

    fn roll_number_taken(&self, roll_number: &str) -> bool {
        self.students.values().any(|s| s.roll_number == roll_number)
    }

    fn email_of(&self, account_id: Uuid) -> String {
        self.accounts
            .get(&account_id)
            .map(|a| a.email.clone())
            .unwrap_or_default()
    }

    fn teacher_view(&self, teacher: &Teacher) -> TeacherView {
        TeacherView {
            id: teacher.id,
            name: teacher.name.clone(),
            employee_id: teacher.employee_id.clone(),
            email: self.email_of(teacher.account_id),
        }
    }

    fn student_view(&self, student: &Student) -> StudentView {
        StudentView {
            id: student.id,
            name: student.name.clone(),
            roll_number: student.roll_number.clone(),
            email: self.email_of(student.account_id),
            teacher_id: student.teacher_id,
        }
    }

    /// Builds an account row; the caller inserts it once every check passed
    fn new_account(&self, data: NewAccount) -> StoreResult<Account> {
        if self.email_taken(&data.email) {
            return Err(StoreError::UniqueViolation(UniqueKey::Email));
        }

        Ok(Account {
            id: Uuid::new_v4(),
            email: data.email,
            password_hash: data.password_hash,
            role: data.role,
            created_at: Utc::now(),
        })
    }
}

/// Store holding everything in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of account rows, for assertions about atomicity
    pub async fn account_count(&self) -> usize {
        self.tables.read().await.accounts.len()
    }

    /// Number of profile rows
    pub async fn profile_count(&self) -> usize {
        self.tables.read().await.profiles.len()
    }
}

#[async_trait]
impl SchoolStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn find_account_by_id(&self, id: Uuid) -> StoreResult<Option<Account>> {
        Ok(self.tables.read().await.accounts.get(&id).cloned())
    }

    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        let tables = self.tables.read().await;
        Ok(tables.accounts.values().find(|a| a.email == email).cloned())
    }

    async fn email_taken(&self, email: &str) -> StoreResult<bool> {
        Ok(self.tables.read().await.email_taken(email))
    }

    async fn employee_id_taken(&self, employee_id: &str) -> StoreResult<bool> {
        Ok(self.tables.read().await.employee_id_taken(employee_id))
    }

    async fn roll_number_taken(&self, roll_number: &str) -> StoreResult<bool> {
        Ok(self.tables.read().await.roll_number_taken(roll_number))
    }

    async fn create_principal(&self, account: NewAccount) -> StoreResult<Account> {
        let mut tables = self.tables.write().await;

        let account = tables.new_account(account)?;
        tables.accounts.insert(account.id, account.clone());

        Ok(account)
    }

    async fn create_teacher(
        &self,
        account: NewAccount,
        teacher: NewTeacher,
    ) -> StoreResult<TeacherView> {
        let mut tables = self.tables.write().await;

        let account = tables.new_account(account)?;
        if tables.employee_id_taken(&teacher.employee_id) {
            return Err(StoreError::UniqueViolation(UniqueKey::EmployeeId));
        }

        let teacher = Teacher {
            id: Uuid::new_v4(),
            name: teacher.name,
            employee_id: teacher.employee_id,
            account_id: account.id,
            created_at: Utc::now(),
        };

        tables.accounts.insert(account.id, account);
        let view = tables.teacher_view(&teacher);
        tables.teachers.insert(teacher.id, teacher);

        Ok(view)
    }

    async fn create_student(
        &self,
        account: NewAccount,
        student: NewStudent,
    ) -> StoreResult<StudentView> {
        let mut tables = self.tables.write().await;

        let account = tables.new_account(account)?;
        if tables.roll_number_taken(&student.roll_number) {
            return Err(StoreError::UniqueViolation(UniqueKey::RollNumber));
        }
        if !tables.teachers.contains_key(&student.teacher_id) {
            return Err(StoreError::MissingReference(Reference::Teacher));
        }

        let student = Student {
            id: Uuid::new_v4(),
            name: student.name,
            roll_number: student.roll_number,
            account_id: account.id,
            teacher_id: student.teacher_id,
            created_at: Utc::now(),
        };

        tables.accounts.insert(account.id, account);
        let view = tables.student_view(&student);
        tables.students.insert(student.id, student);

        Ok(view)
    }

    async fn find_teacher(&self, id: Uuid) -> StoreResult<Option<Teacher>> {
        Ok(self.tables.read().await.teachers.get(&id).cloned())
    }

    async fn find_teacher_by_account(&self, account_id: Uuid) -> StoreResult<Option<Teacher>> {
        let tables = self.tables.read().await;
        Ok(tables
            .teachers
            .values()
            .find(|t| t.account_id == account_id)
            .cloned())
    }

    async fn find_teacher_view(&self, id: Uuid) -> StoreResult<Option<TeacherView>> {
        let tables = self.tables.read().await;
        Ok(tables.teachers.get(&id).map(|t| tables.teacher_view(t)))
    }

    async fn find_student(&self, id: Uuid) -> StoreResult<Option<Student>> {
        Ok(self.tables.read().await.students.get(&id).cloned())
    }

    async fn find_student_by_account(&self, account_id: Uuid) -> StoreResult<Option<Student>> {
        let tables = self.tables.read().await;
        Ok(tables
            .students
            .values()
            .find(|s| s.account_id == account_id)
            .cloned())
    }

    async fn find_student_view(&self, id: Uuid) -> StoreResult<Option<StudentView>> {
        let tables = self.tables.read().await;
        Ok(tables.students.get(&id).map(|s| tables.student_view(s)))
    }

    async fn list_teachers(&self) -> StoreResult<Vec<TeacherView>> {
        let tables = self.tables.read().await;

        let mut teachers: Vec<TeacherView> = tables
            .teachers
            .values()
            .map(|t| tables.teacher_view(t))
            .collect();
        teachers.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.employee_id.cmp(&b.employee_id))
        });

        Ok(teachers)
    }

    async fn list_student_views(&self, teacher_id: Uuid) -> StoreResult<Vec<StudentView>> {
        let tables = self.tables.read().await;

        let mut students: Vec<StudentView> = tables
            .students
            .values()
            .filter(|s| s.teacher_id == teacher_id)
            .map(|s| tables.student_view(s))
            .collect();
        students.sort_by(|a, b| a.roll_number.cmp(&b.roll_number));

        Ok(students)
    }

    async fn find_profile(&self, student_id: Uuid) -> StoreResult<Option<Profile>> {
        Ok(self.tables.read().await.profiles.get(&student_id).cloned())
    }

    async fn list_profiles_for_teacher(&self, teacher_id: Uuid) -> StoreResult<Vec<Profile>> {
        let tables = self.tables.read().await;

        Ok(tables
            .profiles
            .values()
            .filter(|p| {
                tables
                    .students
                    .get(&p.student_id)
                    .is_some_and(|s| s.teacher_id == teacher_id)
            })
            .cloned()
            .collect())
    }

    async fn upsert_profile(
        &self,
        student_id: Uuid,
        fields: &ProfileFields,
    ) -> StoreResult<Profile> {
        let mut tables = self.tables.write().await;

        if !tables.students.contains_key(&student_id) {
            return Err(StoreError::MissingReference(Reference::Student));
        }

        let profile = Profile {
            student_id,
            fields: fields.clone(),
            updated_at: Utc::now(),
        };
        tables.profiles.insert(student_id, profile.clone());

        Ok(profile)
    }
}
