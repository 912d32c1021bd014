/// Integration tests for teacher and student provisioning
///
/// Run with: cargo test -p rollcall-shared --test provisioning_tests

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::{Fixture, PRINCIPAL_EMAIL, PRINCIPAL_PASSWORD};
use rollcall_shared::auth::session::Caller;
use rollcall_shared::models::account::{Account, NewAccount, Role};
use rollcall_shared::models::profile::{Profile, ProfileFields};
use rollcall_shared::models::student::{NewStudent, Student, StudentView};
use rollcall_shared::models::teacher::{NewTeacher, Teacher, TeacherView};
use rollcall_shared::services::provisioning::{CreateStudentInput, CreateTeacherInput};
use rollcall_shared::services::ErrorKind;
use rollcall_shared::store::{MemoryStore, SchoolStore, StoreResult};
use uuid::Uuid;

#[tokio::test]
async fn test_create_teacher_then_listed_once() {
    let fx = Fixture::new().await;

    let teacher = fx
        .service
        .create_teacher(Some(&fx.principal), Fixture::teacher_input("ada"))
        .await
        .unwrap();

    assert_eq!(teacher.email, "ada@school.org");
    assert_eq!(teacher.employee_id, "EMP-ada");

    let teachers = fx.service.list_teachers(Some(&fx.principal)).await.unwrap();
    assert_eq!(teachers.iter().filter(|t| t.id == teacher.id).count(), 1);
}

#[tokio::test]
async fn test_create_teacher_normalizes_email_and_trims() {
    let fx = Fixture::new().await;

    let teacher = fx
        .service
        .create_teacher(
            Some(&fx.principal),
            CreateTeacherInput {
                email: Some("  Ada@School.ORG ".to_string()),
                password: Some("pw".to_string()),
                name: Some(" Ada Lovelace ".to_string()),
                employee_id: Some(" E-1 ".to_string()),
            },
        )
        .await
        .unwrap();

    assert_eq!(teacher.email, "ada@school.org");
    assert_eq!(teacher.name, "Ada Lovelace");
    assert_eq!(teacher.employee_id, "E-1");
}

#[tokio::test]
async fn test_long_names_and_keys_are_accepted() {
    let fx = Fixture::new().await;
    let employee_id = format!("EMP-{}", "9".repeat(70));
    let name = "N".repeat(300);

    let teacher = fx
        .service
        .create_teacher(
            Some(&fx.principal),
            CreateTeacherInput {
                email: Some("long@school.org".to_string()),
                password: Some("pw".to_string()),
                name: Some(name.clone()),
                employee_id: Some(employee_id.clone()),
            },
        )
        .await
        .unwrap();
    assert_eq!(teacher.employee_id, employee_id);
    assert_eq!(teacher.name, name);

    let roll_number = format!("R-{}", "7".repeat(100));
    let student = fx
        .service
        .create_student(
            Some(&fx.principal),
            CreateStudentInput {
                email: Some("long@students.school.org".to_string()),
                password: Some("pw".to_string()),
                name: Some(name.clone()),
                roll_number: Some(roll_number.clone()),
                teacher_id: Some(teacher.id),
            },
        )
        .await
        .unwrap();
    assert_eq!(student.roll_number, roll_number);
}

#[tokio::test]
async fn test_create_teacher_requires_principal() {
    let fx = Fixture::new().await;
    let (_, teacher_caller) = fx.teacher("t1").await;
    let student_caller = Caller::new(Uuid::new_v4(), Role::Student);

    let err = fx
        .service
        .create_teacher(None, Fixture::teacher_input("x"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthenticated);

    for caller in [teacher_caller, student_caller] {
        let err = fx
            .service
            .create_teacher(Some(&caller), Fixture::teacher_input("x"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ForbiddenRole);
    }

    assert!(!fx.store.email_taken("x@school.org").await.unwrap());
}

#[tokio::test]
async fn test_create_teacher_lists_all_missing_fields() {
    let fx = Fixture::new().await;

    let err = fx
        .service
        .create_teacher(
            Some(&fx.principal),
            CreateTeacherInput {
                email: Some("ok@school.org".to_string()),
                password: None,
                name: Some("   ".to_string()),
                employee_id: Some(String::new()),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.fields(), ["password", "name", "employee_id"]);
}

#[tokio::test]
async fn test_create_teacher_rejects_malformed_email() {
    let fx = Fixture::new().await;

    let mut input = Fixture::teacher_input("bad");
    input.email = Some("not an email".to_string());

    let err = fx
        .service
        .create_teacher(Some(&fx.principal), input)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.fields(), ["email"]);
}

#[tokio::test]
async fn test_duplicate_email_is_conflict_case_insensitively() {
    let fx = Fixture::new().await;
    fx.teacher("ada").await;

    let mut input = Fixture::teacher_input("other");
    input.email = Some("ADA@school.org".to_string());

    let err = fx
        .service
        .create_teacher(Some(&fx.principal), input)
        .await
        .unwrap_err();

    assert_eq!(err.kind().code(), "CONFLICT_EMAIL");
}

#[tokio::test]
async fn test_duplicate_employee_id_with_different_email() {
    let fx = Fixture::new().await;
    fx.teacher("ada").await;

    let mut input = Fixture::teacher_input("grace");
    input.employee_id = Some("EMP-ada".to_string());

    let err = fx
        .service
        .create_teacher(Some(&fx.principal), input)
        .await
        .unwrap_err();

    assert_eq!(err.kind().code(), "CONFLICT_EMPLOYEE_ID");
    assert_eq!(fx.service.list_teachers(Some(&fx.principal)).await.unwrap().len(), 1);
    assert!(!fx.store.email_taken("grace@school.org").await.unwrap());
}

#[tokio::test]
async fn test_create_student_with_unknown_teacher_then_retry() {
    let fx = Fixture::new().await;
    let accounts_before = fx.store.account_count().await;

    let err = fx
        .service
        .create_student(Some(&fx.principal), Fixture::student_input("s1", Uuid::new_v4()))
        .await
        .unwrap_err();

    assert_eq!(err.kind().code(), "NOT_FOUND_TEACHER");
    assert_eq!(fx.store.account_count().await, accounts_before);

    let (teacher, _) = fx.teacher("ada").await;
    let student = fx
        .service
        .create_student(Some(&fx.principal), Fixture::student_input("s1", teacher.id))
        .await
        .unwrap();

    assert_eq!(student.teacher_id, teacher.id);
    assert_eq!(student.roll_number, "R-s1");
    assert_eq!(student.email, "s1@students.school.org");
}

#[tokio::test]
async fn test_create_student_check_precedence() {
    let fx = Fixture::new().await;
    let (teacher, _) = fx.teacher("ada").await;
    fx.student("s1", teacher.id).await;

    // Email conflict wins over roll number conflict and unknown teacher
    let mut input = Fixture::student_input("s1", Uuid::new_v4());
    let err = fx
        .service
        .create_student(Some(&fx.principal), input.clone())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConflictEmail);

    // Roll number conflict wins over unknown teacher
    input.email = Some("fresh@students.school.org".to_string());
    let err = fx
        .service
        .create_student(Some(&fx.principal), input.clone())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConflictRollNumber);

    input.roll_number = Some("R-fresh".to_string());
    let err = fx
        .service
        .create_student(Some(&fx.principal), input)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFoundTeacher);
}

#[tokio::test]
async fn test_create_student_missing_fields() {
    let fx = Fixture::new().await;

    let err = fx
        .service
        .create_student(Some(&fx.principal), CreateStudentInput::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(
        err.fields(),
        ["email", "password", "name", "roll_number", "teacher_id"]
    );
}

#[tokio::test]
async fn test_bootstrap_principal_is_idempotent() {
    let fx = Fixture::new().await;
    let accounts = fx.store.account_count().await;

    let again = fx
        .service
        .bootstrap_principal(PRINCIPAL_EMAIL, "a-different-password")
        .await
        .unwrap();

    assert!(again.is_none());
    assert_eq!(fx.store.account_count().await, accounts);

    // The original password still works
    let account = fx
        .service
        .authenticate(PRINCIPAL_EMAIL, PRINCIPAL_PASSWORD)
        .await
        .unwrap();
    assert_eq!(account.role, Role::Principal);
}

#[tokio::test]
async fn test_credentials_never_leave_the_service() {
    let fx = Fixture::new().await;
    let (teacher, _) = fx.teacher("ada").await;
    let (student, _) = fx.student("s1", teacher.id).await;

    let teacher_json = serde_json::to_value(&teacher).unwrap();
    let student_json = serde_json::to_value(&student).unwrap();

    for json in [teacher_json, student_json] {
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
    }
}

/// Store whose advisory uniqueness checks always pass, as if another request
/// inserted the conflicting row right after the check
struct RacyStore(Arc<MemoryStore>);

#[async_trait]
impl SchoolStore for RacyStore {
    fn backend(&self) -> &'static str {
        "racy"
    }

    async fn ping(&self) -> StoreResult<()> {
        self.0.ping().await
    }

    async fn find_account_by_id(&self, id: Uuid) -> StoreResult<Option<Account>> {
        self.0.find_account_by_id(id).await
    }

    async fn find_account_by_email(&self, email: &str) -> StoreResult<Option<Account>> {
        self.0.find_account_by_email(email).await
    }

    async fn email_taken(&self, _email: &str) -> StoreResult<bool> {
        Ok(false)
    }

    async fn employee_id_taken(&self, _employee_id: &str) -> StoreResult<bool> {
        Ok(false)
    }

    async fn roll_number_taken(&self, _roll_number: &str) -> StoreResult<bool> {
        Ok(false)
    }

    async fn create_principal(&self, account: NewAccount) -> StoreResult<Account> {
        self.0.create_principal(account).await
    }

    async fn create_teacher(
        &self,
        account: NewAccount,
        teacher: NewTeacher,
    ) -> StoreResult<TeacherView> {
        self.0.create_teacher(account, teacher).await
    }

    async fn create_student(
        &self,
        account: NewAccount,
        student: NewStudent,
    ) -> StoreResult<StudentView> {
        self.0.create_student(account, student).await
    }

    async fn find_teacher(&self, id: Uuid) -> StoreResult<Option<Teacher>> {
        self.0.find_teacher(id).await
    }

    async fn find_teacher_by_account(&self, account_id: Uuid) -> StoreResult<Option<Teacher>> {
        self.0.find_teacher_by_account(account_id).await
    }

    async fn find_teacher_view(&self, id: Uuid) -> StoreResult<Option<TeacherView>> {
        self.0.find_teacher_view(id).await
    }

    async fn find_student(&self, id: Uuid) -> StoreResult<Option<Student>> {
        self.0.find_student(id).await
    }

    async fn find_student_by_account(&self, account_id: Uuid) -> StoreResult<Option<Student>> {
        self.0.find_student_by_account(account_id).await
    }

    async fn find_student_view(&self, id: Uuid) -> StoreResult<Option<StudentView>> {
        self.0.find_student_view(id).await
    }

    async fn list_teachers(&self) -> StoreResult<Vec<TeacherView>> {
        self.0.list_teachers().await
    }

    async fn list_student_views(&self, teacher_id: Uuid) -> StoreResult<Vec<StudentView>> {
        self.0.list_student_views(teacher_id).await
    }

    async fn find_profile(&self, student_id: Uuid) -> StoreResult<Option<Profile>> {
        self.0.find_profile(student_id).await
    }

    async fn list_profiles_for_teacher(&self, teacher_id: Uuid) -> StoreResult<Vec<Profile>> {
        self.0.list_profiles_for_teacher(teacher_id).await
    }

    async fn upsert_profile(
        &self,
        student_id: Uuid,
        fields: &ProfileFields,
    ) -> StoreResult<Profile> {
        self.0.upsert_profile(student_id, fields).await
    }
}

#[tokio::test]
async fn test_insert_time_conflicts_map_to_conflict_codes() {
    let store = Arc::new(MemoryStore::new());
    let fx = Fixture::with_store(store.clone(), Arc::new(RacyStore(store))).await;
    let (teacher, _) = fx.teacher("ada").await;
    fx.student("s1", teacher.id).await;
    let accounts = fx.store.account_count().await;

    let mut dup_email = Fixture::teacher_input("grace");
    dup_email.email = Some("ada@school.org".to_string());
    let err = fx
        .service
        .create_teacher(Some(&fx.principal), dup_email)
        .await
        .unwrap_err();
    assert_eq!(err.kind().code(), "CONFLICT_EMAIL");

    let mut dup_employee = Fixture::teacher_input("grace");
    dup_employee.employee_id = Some("EMP-ada".to_string());
    let err = fx
        .service
        .create_teacher(Some(&fx.principal), dup_employee)
        .await
        .unwrap_err();
    assert_eq!(err.kind().code(), "CONFLICT_EMPLOYEE_ID");

    let mut dup_roll = Fixture::student_input("s2", teacher.id);
    dup_roll.roll_number = Some("R-s1".to_string());
    let err = fx
        .service
        .create_student(Some(&fx.principal), dup_roll)
        .await
        .unwrap_err();
    assert_eq!(err.kind().code(), "CONFLICT_ROLL_NUMBER");

    // No half-created accounts
    assert_eq!(fx.store.account_count().await, accounts);
}
