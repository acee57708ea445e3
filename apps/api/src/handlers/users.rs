use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use orgportal_application::{CreateUserInput, UpdateUserInput, UserListRequest};
use orgportal_core::Principal;
use orgportal_domain::UserId;

use crate::dto::{
    CreateUserRequest, UpdateUserRequest, UserListParams, UserListResponse, UserResponse,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<UserListParams>,
) -> ApiResult<Json<UserListResponse>> {
    let request = UserListRequest::from(params);
    let sort = request.sort;
    let page = state
        .user_admin_service
        .list_users(&principal, request)
        .await?;

    Ok(Json(UserListResponse::from_page(page, sort)))
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<UserResponse>> {
    let profile = state
        .user_admin_service
        .get_user(&principal, UserId::new(user_id))
        .await?;

    Ok(Json(profile.into()))
}

pub async fn create_user_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .user_admin_service
        .create_user(&principal, CreateUserInput::try_from(payload)?)
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn update_user_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .user_admin_service
        .update_user(
            &principal,
            UserId::new(user_id),
            UpdateUserInput::try_from(payload)?,
        )
        .await?;

    Ok(Json(user.into()))
}

pub async fn assignable_roles_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<String>>> {
    let roles = state
        .user_admin_service
        .assignable_roles(&principal)?
        .into_iter()
        .map(|role| role.as_str().to_owned())
        .collect();

    Ok(Json(roles))
}
