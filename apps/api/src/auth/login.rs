use axum::Json;
use axum::extract::State;
use orgportal_application::AuthOutcome;
use orgportal_core::AppError;
use tower_sessions::Session;

use crate::dto::{LoginRequest, LoginResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::{SESSION_CREATED_AT_KEY, SESSION_PRINCIPAL_KEY};

/// POST /auth/login - Authenticate with email+password.
pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let outcome = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    match outcome {
        AuthOutcome::Authenticated(principal) => {
            // New session id on privilege change.
            session.cycle_id().await.map_err(|error| {
                AppError::Internal(format!("failed to cycle session id: {error}"))
            })?;

            session
                .insert(SESSION_PRINCIPAL_KEY, &principal)
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to persist session principal: {error}"))
                })?;

            session
                .insert(SESSION_CREATED_AT_KEY, chrono::Utc::now().timestamp())
                .await
                .map_err(|error| {
                    AppError::Internal(format!("failed to persist session creation time: {error}"))
                })?;

            Ok(Json(LoginResponse {
                status: "authenticated".to_owned(),
            }))
        }
        AuthOutcome::Failed => {
            Err(AppError::Unauthorized("invalid email or password".to_owned()).into())
        }
    }
}
