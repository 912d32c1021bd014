/// Teacher endpoints (principal only)
///
/// # Endpoints
///
/// - `POST /v1/teachers` - Create a teacher account and record
/// - `GET /v1/teachers` - List all teachers, ordered by name

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use rollcall_shared::{
    auth::session::Session, models::teacher::TeacherView,
    services::provisioning::CreateTeacherInput,
};
use serde::{Deserialize, Serialize};

/// Teacher list response
#[derive(Debug, Serialize, Deserialize)]
pub struct TeacherListResponse {
    pub teachers: Vec<TeacherView>,
}

/// Create a teacher
///
/// ```text
/// POST /v1/teachers
/// Authorization: Bearer eyJ...
///
/// {
///   "email": "ada@school.org",
///   "password": "s3cret",
///   "name": "Ada Lovelace",
///   "employee_id": "E-001"
/// }
/// ```
///
/// Answers `201 Created` with `{id, name, employee_id, email}`.
///
/// # Errors
///
/// - `400`: a field is missing or the email is malformed
/// - `403`: caller is not the principal
/// - `409`: email or employee id already in use
pub async fn create_teacher(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    body: Result<Json<CreateTeacherInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<TeacherView>)> {
    let Json(input) = body?;
    let teacher = state.school.create_teacher(session.caller(), input).await?;
    Ok((StatusCode::CREATED, Json(teacher)))
}

/// List teachers
pub async fn list_teachers(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<TeacherListResponse>> {
    let teachers = state.school.list_teachers(session.caller()).await?;
    Ok(Json(TeacherListResponse { teachers }))
}
