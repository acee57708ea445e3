use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use orgportal_core::{AppError, Principal};
use orgportal_domain::access::logged_in_user_id;
use tower_sessions::Session;

use crate::dto::PrincipalResponse;
use crate::error::ApiResult;
use crate::state::AppState;

use super::SESSION_PRINCIPAL_KEY;

/// POST /auth/logout - Drop organization selections and end the session.
///
/// Without a signed-in principal the request is rejected with 400 and the
/// session is left untouched.
pub async fn logout_handler(
    State(state): State<AppState>,
    session: Session,
) -> ApiResult<StatusCode> {
    let principal = session
        .get::<Principal>(SESSION_PRINCIPAL_KEY)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to read session principal: {error}"))
        })?;

    state.auth_service.logout(principal.as_ref()).await?;

    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me - The signed-in principal and its organization scope.
pub async fn me_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<PrincipalResponse>> {
    let user_id = logged_in_user_id::<i64>(Some(&principal))?;
    let scope = state.selection_service.scope_for(&principal).await?;

    Ok(Json(PrincipalResponse::from_principal(
        &principal, user_id, scope,
    )))
}
