#![allow(dead_code)]

/// Shared fixtures for service-level tests
///
/// Everything runs over `MemoryStore` with a cheap Argon2 configuration.

use std::sync::Arc;

use rollcall_shared::auth::password::{Argon2Hasher, HasherParams};
use rollcall_shared::auth::session::Caller;
use rollcall_shared::models::account::Role;
use rollcall_shared::models::student::StudentView;
use rollcall_shared::models::teacher::TeacherView;
use rollcall_shared::services::provisioning::{CreateStudentInput, CreateTeacherInput};
use rollcall_shared::services::SchoolService;
use rollcall_shared::store::{MemoryStore, SchoolStore};

pub const PRINCIPAL_EMAIL: &str = "principal@school.org";
pub const PRINCIPAL_PASSWORD: &str = "principal-password";

pub fn fast_hasher() -> Argon2Hasher {
    Argon2Hasher::new(HasherParams {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
}

pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub service: SchoolService,
    pub principal: Caller,
}

impl Fixture {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::with_store(store.clone(), store).await
    }

    /// Builds a fixture whose service talks to `backend` while assertions
    /// can still inspect `store`
    pub async fn with_store(store: Arc<MemoryStore>, backend: Arc<dyn SchoolStore>) -> Self {
        let service = SchoolService::new(backend, Arc::new(fast_hasher()));

        let account = service
            .bootstrap_principal(PRINCIPAL_EMAIL, PRINCIPAL_PASSWORD)
            .await
            .expect("bootstrap should succeed")
            .expect("principal should be created");

        Self {
            store,
            service,
            principal: Caller::new(account.id, Role::Principal),
        }
    }

    pub fn teacher_input(tag: &str) -> CreateTeacherInput {
        CreateTeacherInput {
            email: Some(format!("{}@school.org", tag)),
            password: Some("teacher-password".to_string()),
            name: Some(format!("Teacher {}", tag)),
            employee_id: Some(format!("EMP-{}", tag)),
        }
    }

    pub fn student_input(tag: &str, teacher_id: uuid::Uuid) -> CreateStudentInput {
        CreateStudentInput {
            email: Some(format!("{}@students.school.org", tag)),
            password: Some("student-password".to_string()),
            name: Some(format!("Student {}", tag)),
            roll_number: Some(format!("R-{}", tag)),
            teacher_id: Some(teacher_id),
        }
    }

    /// Creates a teacher and returns it with a caller acting as that teacher
    pub async fn teacher(&self, tag: &str) -> (TeacherView, Caller) {
        let teacher = self
            .service
            .create_teacher(Some(&self.principal), Self::teacher_input(tag))
            .await
            .expect("teacher creation should succeed");

        let row = self
            .store
            .find_teacher(teacher.id)
            .await
            .unwrap()
            .expect("teacher row should exist");

        (teacher, Caller::new(row.account_id, Role::Teacher))
    }

    /// Creates a student assigned to `teacher_id` and returns it with a
    /// caller acting as that student
    pub async fn student(&self, tag: &str, teacher_id: uuid::Uuid) -> (StudentView, Caller) {
        let student = self
            .service
            .create_student(Some(&self.principal), Self::student_input(tag, teacher_id))
            .await
            .expect("student creation should succeed");

        let row = self
            .store
            .find_student(student.id)
            .await
            .unwrap()
            .expect("student row should exist");

        (student, Caller::new(row.account_id, Role::Student))
    }
}
