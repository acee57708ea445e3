use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use orgportal_application::ConfigurationListRequest;
use orgportal_core::Principal;
use orgportal_domain::ConfigurationId;

use crate::dto::{
    ConfigurationDefaultsResponse, ConfigurationListParams, ConfigurationListResponse,
    ConfigurationResponse, SaveConfigurationRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_configurations_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<ConfigurationListParams>,
) -> ApiResult<Json<ConfigurationListResponse>> {
    let listing = state
        .configuration_service
        .list_configurations(&principal, ConfigurationListRequest::try_from(params)?)
        .await?;

    Ok(Json(listing.into()))
}

pub async fn get_configuration_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(configuration_id): Path<ConfigurationId>,
) -> ApiResult<Json<ConfigurationResponse>> {
    let configuration = state
        .configuration_service
        .get_configuration(&principal, configuration_id)
        .await?;

    Ok(Json(configuration.into()))
}

pub async fn configuration_defaults_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<ConfigurationDefaultsResponse>> {
    let organization_id = state
        .configuration_service
        .new_configuration_defaults(&principal)
        .await?;

    Ok(Json(ConfigurationDefaultsResponse {
        organization_id: organization_id.map(|organization_id| organization_id.as_i64()),
    }))
}

pub async fn create_configuration_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<SaveConfigurationRequest>,
) -> ApiResult<(StatusCode, Json<ConfigurationResponse>)> {
    let configuration = state
        .configuration_service
        .save_configuration(&principal, payload.into_input(None)?)
        .await?;

    Ok((StatusCode::CREATED, Json(configuration.into())))
}

pub async fn update_configuration_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(configuration_id): Path<ConfigurationId>,
    Json(payload): Json<SaveConfigurationRequest>,
) -> ApiResult<Json<ConfigurationResponse>> {
    let configuration = state
        .configuration_service
        .save_configuration(&principal, payload.into_input(Some(configuration_id))?)
        .await?;

    Ok(Json(configuration.into()))
}
