use axum::extract::{Request, State};
use axum::http::{HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use orgportal_core::{AppError, Principal};
use orgportal_domain::access::can_administer;
use tower_sessions::Session;

use crate::auth::{SESSION_CREATED_AT_KEY, SESSION_MAX_AGE_HOURS, SESSION_PRINCIPAL_KEY};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let principal = session
        .get::<Principal>(SESSION_PRINCIPAL_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session principal: {error}")))?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let created_at = session
        .get::<i64>(SESSION_CREATED_AT_KEY)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to read session creation time: {error}"))
        })?;

    if session_expired(created_at, chrono::Utc::now().timestamp()) {
        session.flush().await.map_err(|error| {
            AppError::Internal(format!("failed to flush expired session: {error}"))
        })?;
        return Err(AppError::Unauthorized("session expired".to_owned()).into());
    }

    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

/// Admin pages are open to Admins and SuperUsers. Runs after [`require_auth`].
pub async fn require_admin(request: Request, next: Next) -> ApiResult<Response> {
    ensure_administrator(request.extensions().get::<Principal>())?;
    Ok(next.run(request).await)
}

pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method()) {
        let headers = request.headers();

        if let Some(fetch_site) = headers.get("sec-fetch-site") {
            if fetch_site == HeaderValue::from_static("cross-site") {
                return Err(AppError::Unauthorized("cross-site request blocked".to_owned()).into());
            }
        }

        let origin = headers
            .get(header::ORIGIN)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        let referer = headers
            .get(header::REFERER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        if !origin_is_allowed(origin, referer, &state.frontend_url) {
            return Err(AppError::Unauthorized("origin validation failed".to_owned()).into());
        }
    }

    Ok(next.run(request).await)
}

/// Sessions without a creation time never came from a login and are expired.
fn session_expired(created_at: Option<i64>, now: i64) -> bool {
    created_at.is_none_or(|created_at| now - created_at >= SESSION_MAX_AGE_HOURS * 3600)
}

fn ensure_administrator(principal: Option<&Principal>) -> Result<(), AppError> {
    let principal =
        principal.ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    if !can_administer(principal) {
        return Err(AppError::Forbidden(
            "administrator role is required".to_owned(),
        ));
    }

    Ok(())
}

fn origin_is_allowed(origin: &str, referer: &str, allowed_origin: &str) -> bool {
    origin == allowed_origin || referer.starts_with(allowed_origin)
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

#[cfg(test)]
mod tests {
    use axum::http::Method;
    use orgportal_core::{AppError, Principal, Role};

    use super::{ensure_administrator, is_state_changing_method, origin_is_allowed, session_expired};

    #[test]
    fn admin_gate_accepts_admins_and_super_users() {
        let admin = Principal::new([Role::Admin], Vec::new());
        let super_user = Principal::new([Role::SuperUser], Vec::new());
        let user = Principal::new([Role::User], Vec::new());

        assert!(ensure_administrator(Some(&admin)).is_ok());
        assert!(ensure_administrator(Some(&super_user)).is_ok());
        assert!(matches!(
            ensure_administrator(Some(&user)),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            ensure_administrator(None),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn only_mutating_methods_are_origin_checked() {
        assert!(is_state_changing_method(&Method::POST));
        assert!(is_state_changing_method(&Method::DELETE));
        assert!(!is_state_changing_method(&Method::GET));
        assert!(!is_state_changing_method(&Method::OPTIONS));
    }

    #[test]
    fn origin_or_referer_must_match_frontend() {
        let frontend = "http://localhost:3000";

        assert!(origin_is_allowed(frontend, "", frontend));
        assert!(origin_is_allowed("", "http://localhost:3000/users/4", frontend));
        assert!(!origin_is_allowed("http://evil.test", "", frontend));
    }

    #[test]
    fn sessions_expire_after_absolute_lifetime() {
        let created_at = 1_709_281_800;
        let max_age = super::SESSION_MAX_AGE_HOURS * 3600;

        assert!(!session_expired(Some(created_at), created_at));
        assert!(!session_expired(Some(created_at), created_at + max_age - 1));
        assert!(session_expired(Some(created_at), created_at + max_age));
        assert!(session_expired(None, created_at));
    }
}
