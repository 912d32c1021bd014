/// Student provisioning endpoint (principal only)
///
/// ```text
/// POST /v1/students
/// Authorization: Bearer eyJ...
///
/// {
///   "email": "sam@school.org",
///   "password": "s3cret",
///   "name": "Sam",
///   "roll_number": "R-17",
///   "teacher_id": "6f1c..."
/// }
/// ```
///
/// Answers `201 Created` with `{id, name, roll_number, email, teacher_id}`.
/// An unknown `teacher_id` is `404 NOT_FOUND_TEACHER` and creates nothing.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use rollcall_shared::{
    auth::session::Session, models::student::StudentView,
    services::provisioning::CreateStudentInput,
};

pub async fn create_student(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    body: Result<Json<CreateStudentInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<StudentView>)> {
    let Json(input) = body?;
    let student = state.school.create_student(session.caller(), input).await?;
    Ok((StatusCode::CREATED, Json(student)))
}
