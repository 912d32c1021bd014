/// Session resolution middleware
///
/// Runs on every request. A request without an `Authorization` header gets
/// an anonymous [`Session`]; whether that is acceptable is decided later by
/// the operation itself. A header carrying an invalid or expired token is
/// rejected here with `401 UNAUTHENTICATED`.
///
/// Handlers read the result with `Extension<Session>`.

use crate::{app::AppState, error::ApiError};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use rollcall_shared::auth::session::Session;

pub async fn session_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| ApiError::Unauthorized("Malformed authorization header".to_string()))
        })
        .transpose()?;

    let session = Session::from_authorization(auth_header, state.jwt_secret())?;

    if let Some(caller) = session.caller() {
        tracing::debug!(account_id = %caller.account_id, role = %caller.role, "Resolved caller");
    }

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}
