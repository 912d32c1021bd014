/// Profile workflow: draft saves and final submission
///
/// A teacher fills in a student's profile over several visits. A draft save
/// accepts any subset of fields; a final submission requires all four to be
/// non-empty and writes nothing otherwise. Either way the stored profile is
/// overwritten in full, with absent fields stored as empty strings.
///
/// ```text
/// save_profile(caller, student_id, input, is_final)
///   ├─> role gate (teacher)
///   ├─> caller's teacher row      ── missing ──> NOT_FOUND_TEACHER
///   ├─> target student            ── missing ──> NOT_FOUND_STUDENT
///   ├─> assignment check          ── other  ───> FORBIDDEN_RELATIONSHIP
///   ├─> is_final && incomplete    ──────────────> VALIDATION_ERROR (no write)
///   └─> upsert, return profile + completion percent
/// ```

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use super::{SchoolService, ServiceError, ServiceResult};
use crate::auth::authorization::{authorize, Action, Ownership};
use crate::auth::session::Caller;
use crate::models::profile::{Profile, ProfileInput};
use crate::models::student::Student;
use crate::models::teacher::Teacher;

pub const SUBMITTED_MESSAGE: &str = "Profile submitted successfully";
pub const DRAFT_MESSAGE: &str = "Progress saved";
pub const INCOMPLETE_MESSAGE: &str = "All fields must be filled for final submission";

/// Result of a successful save
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedProfile {
    pub message: String,
    pub profile: Profile,
    pub completion_percent: u8,
}

impl SchoolService {
    /// Resolves the calling teacher and a student assigned to them
    ///
    /// Shared by every teacher-scoped operation that names a student.
    pub(crate) async fn teacher_and_student(
        &self,
        caller: Option<&Caller>,
        action: Action,
        student_id: Uuid,
    ) -> ServiceResult<(Teacher, Student)> {
        let caller = authorize(caller, action, None)?;

        let teacher = self
            .store
            .find_teacher_by_account(caller.account_id)
            .await?
            .ok_or(ServiceError::TeacherNotFound)?;

        let student = self
            .store
            .find_student(student_id)
            .await?
            .ok_or(ServiceError::StudentNotFound)?;

        authorize(
            Some(caller),
            action,
            Some(Ownership::new(teacher.id, student.teacher_id)),
        )?;

        Ok((teacher, student))
    }

    /// Saves a student's profile as a draft or as a final submission
    ///
    /// # Errors
    ///
    /// - `UNAUTHENTICATED` / `FORBIDDEN_ROLE` unless called by a teacher
    /// - `NOT_FOUND_TEACHER` if the caller has no teacher record
    /// - `NOT_FOUND_STUDENT` if the student does not exist
    /// - `FORBIDDEN_RELATIONSHIP` if the student belongs to another teacher
    /// - `VALIDATION_ERROR` on a final submission with any blank field
    pub async fn save_profile(
        &self,
        caller: Option<&Caller>,
        student_id: Uuid,
        input: ProfileInput,
        is_final: bool,
    ) -> ServiceResult<SavedProfile> {
        let (teacher, student) = self
            .teacher_and_student(caller, Action::WriteStudentProfile, student_id)
            .await?;

        let fields = input.into_fields();

        if is_final && !fields.is_complete() {
            let missing: Vec<String> = fields
                .missing_fields()
                .into_iter()
                .map(str::to_string)
                .collect();
            warn!(
                student_id = %student.id,
                missing = ?missing,
                "Final submission rejected: incomplete profile"
            );
            return Err(ServiceError::validation(INCOMPLETE_MESSAGE, missing));
        }

        let profile = self.store.upsert_profile(student.id, &fields).await?;
        let completion_percent = profile.fields.completion_percent();

        info!(
            student_id = %student.id,
            teacher_id = %teacher.id,
            is_final,
            completion_percent,
            "Profile saved"
        );

        let message = if is_final {
            SUBMITTED_MESSAGE
        } else {
            DRAFT_MESSAGE
        };

        Ok(SavedProfile {
            message: message.to_string(),
            profile,
            completion_percent,
        })
    }
}
