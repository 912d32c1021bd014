/// A student's own record
///
/// ```text
/// GET /v1/student/profile
/// Authorization: Bearer eyJ...
/// ```
///
/// Answers `{student: {id, name, roll_number, email, teacher: {name, email},
/// profile, completion_percent, is_complete}}`. The profile is `null` until a
/// teacher first saves it.

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, Extension, Json};
use rollcall_shared::{auth::session::Session, services::dashboard::StudentRecord};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct OwnProfileResponse {
    pub student: StudentRecord,
}

pub async fn view_own_profile(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> ApiResult<Json<OwnProfileResponse>> {
    let student = state.school.view_own_profile(session.caller()).await?;
    Ok(Json(OwnProfileResponse { student }))
}
