/// Role-scoped read projections
///
/// - Principals list every teacher
/// - Teachers list and open their own students, each with its profile and
///   completion percentage
/// - Students read their own record
///
/// Nothing here writes. Completion is derived on every read from the stored
/// fields, the same way the write path derives it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use super::{SchoolService, ServiceError, ServiceResult};
use crate::auth::authorization::{authorize, Action};
use crate::auth::session::Caller;
use crate::models::profile::{completion_percent, profile_state, Profile, ProfileState};
use crate::models::student::StudentView;
use crate::models::teacher::TeacherView;

/// A student as seen by their teacher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentOverview {
    #[serde(flatten)]
    pub student: StudentView,

    /// `None` until the teacher first saves the profile
    pub profile: Option<Profile>,

    pub completion_percent: u8,
    pub is_complete: bool,
    pub state: ProfileState,
}

impl StudentOverview {
    fn new(student: StudentView, profile: Option<Profile>) -> Self {
        let completion_percent = completion_percent(profile.as_ref());
        Self {
            student,
            is_complete: completion_percent == 100,
            state: profile_state(profile.as_ref()),
            profile,
            completion_percent,
        }
    }
}

/// Teacher details shown to a student
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherContact {
    pub name: String,
    pub email: String,
}

/// A student's own record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub id: Uuid,
    pub name: String,
    pub roll_number: String,
    pub email: String,
    pub teacher: TeacherContact,
    pub profile: Option<Profile>,
    pub completion_percent: u8,
    pub is_complete: bool,
    pub state: ProfileState,
}

impl SchoolService {
    /// Lists every teacher, ordered by name
    pub async fn list_teachers(&self, caller: Option<&Caller>) -> ServiceResult<Vec<TeacherView>> {
        authorize(caller, Action::ListTeachers, None)?;

        let teachers = self.store.list_teachers().await?;
        debug!(count = teachers.len(), "Listed teachers");

        Ok(teachers)
    }

    /// Lists the caller's own students with their profiles
    ///
    /// # Errors
    ///
    /// `NOT_FOUND_TEACHER` if the caller's account has no teacher record.
    pub async fn list_own_students(
        &self,
        caller: Option<&Caller>,
    ) -> ServiceResult<Vec<StudentOverview>> {
        let caller = authorize(caller, Action::ListOwnStudents, None)?;

        let teacher = self
            .store
            .find_teacher_by_account(caller.account_id)
            .await?
            .ok_or(ServiceError::TeacherNotFound)?;

        let students = self.store.list_student_views(teacher.id).await?;
        let mut profiles: HashMap<Uuid, Profile> = self
            .store
            .list_profiles_for_teacher(teacher.id)
            .await?
            .into_iter()
            .map(|p| (p.student_id, p))
            .collect();

        debug!(teacher_id = %teacher.id, count = students.len(), "Listed own students");

        Ok(students
            .into_iter()
            .map(|s| {
                let profile = profiles.remove(&s.id);
                StudentOverview::new(s, profile)
            })
            .collect())
    }

    /// Opens one of the caller's students
    ///
    /// # Errors
    ///
    /// `NOT_FOUND_TEACHER`, `NOT_FOUND_STUDENT`, or `FORBIDDEN_RELATIONSHIP`
    /// when the student is assigned to someone else.
    pub async fn view_student(
        &self,
        caller: Option<&Caller>,
        student_id: Uuid,
    ) -> ServiceResult<StudentOverview> {
        let (_, student) = self
            .teacher_and_student(caller, Action::ViewStudent, student_id)
            .await?;

        let view = self
            .store
            .find_student_view(student.id)
            .await?
            .ok_or(ServiceError::StudentNotFound)?;
        let profile = self.store.find_profile(student.id).await?;

        Ok(StudentOverview::new(view, profile))
    }

    /// Reads the calling student's own record
    ///
    /// # Errors
    ///
    /// `NOT_FOUND_STUDENT` if the caller's account has no student record.
    pub async fn view_own_profile(&self, caller: Option<&Caller>) -> ServiceResult<StudentRecord> {
        let caller = authorize(caller, Action::ViewOwnProfile, None)?;

        let student = self
            .store
            .find_student_by_account(caller.account_id)
            .await?
            .ok_or(ServiceError::StudentNotFound)?;

        let email = self
            .store
            .find_account_by_id(student.account_id)
            .await?
            .map(|a| a.email)
            .ok_or(ServiceError::StudentNotFound)?;

        let teacher = self
            .store
            .find_teacher_view(student.teacher_id)
            .await?
            .ok_or(ServiceError::TeacherNotFound)?;

        let profile = self.store.find_profile(student.id).await?;
        let completion_percent = completion_percent(profile.as_ref());
        let state = profile_state(profile.as_ref());

        Ok(StudentRecord {
            id: student.id,
            name: student.name,
            roll_number: student.roll_number,
            email,
            teacher: TeacherContact {
                name: teacher.name,
                email: teacher.email,
            },
            profile,
            completion_percent,
            is_complete: completion_percent == 100,
            state,
        })
    }
}
