/// A teacher's view of their own students
///
/// # Endpoints
///
/// - `GET /v1/teacher/students` - Assigned students with profile progress
/// - `GET /v1/teacher/students/:id` - One assigned student
/// - `POST /v1/teacher/students/:id/profile` - Save a draft or final profile
///
/// A student assigned to another teacher is `403 FORBIDDEN_RELATIONSHIP`;
/// an id that matches no student at all is `404 NOT_FOUND_STUDENT`.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};
use rollcall_shared::{
    auth::session::Session,
    models::profile::ProfileInput,
    services::{dashboard::StudentOverview, profile::SavedProfile},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Student list response
#[derive(Debug, Serialize, Deserialize)]
pub struct StudentListResponse {
    pub students: Vec<StudentOverview>,
}

/// Single student response
#[derive(Debug, Serialize, Deserialize)]
pub struct StudentResponse {
    pub student: StudentOverview,
}

/// Profile save request
///
/// The four profile fields are optional; `is_final` defaults to a draft save.
#[derive(Debug, Deserialize)]
pub struct SaveProfileRequest {
    #[serde(flatten)]
    pub fields: ProfileInput,

    #[serde(default)]
    pub is_final: bool,
}

pub async fn list_students(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<StudentListResponse>> {
    let students = state.school.list_own_students(session.caller()).await?;
    Ok(Json(StudentListResponse { students }))
}

pub async fn view_student(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<StudentResponse>> {
    let Path(student_id) = path?;
    let student = state
        .school
        .view_student(session.caller(), student_id)
        .await?;
    Ok(Json(StudentResponse { student }))
}

/// Save a student's profile
///
/// ```text
/// POST /v1/teacher/students/:id/profile
///
/// { "full_name": "Jane", "address": "1 Elm Street", "is_final": false }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "message": "Progress saved",
///   "profile": { "student_id": "...", "full_name": "Jane", ... },
///   "completion_percent": 50
/// }
/// ```
///
/// A final save with any empty field is `400 VALIDATION_ERROR` and leaves the
/// stored profile untouched.
pub async fn save_profile(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<SaveProfileRequest>, JsonRejection>,
) -> ApiResult<Json<SavedProfile>> {
    let Path(student_id) = path?;
    let Json(req) = body?;

    let saved = state
        .school
        .save_profile(session.caller(), student_id, req.fields, req.is_final)
        .await?;
    Ok(Json(saved))
}
