use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use orgportal_core::{OrganizationId, Principal};
use orgportal_domain::OrganizationDraft;

use crate::dto::{OrganizationResponse, SaveOrganizationRequest};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_organizations_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<OrganizationResponse>>> {
    let organizations = state
        .organization_service
        .list_organizations(&principal)
        .await?
        .into_iter()
        .map(OrganizationResponse::from)
        .collect();

    Ok(Json(organizations))
}

pub async fn get_organization_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(organization_id): Path<i64>,
) -> ApiResult<Json<OrganizationResponse>> {
    let organization = state
        .organization_service
        .get_organization(&principal, OrganizationId::new(organization_id))
        .await?;

    Ok(Json(organization.into()))
}

pub async fn create_organization_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<SaveOrganizationRequest>,
) -> ApiResult<(StatusCode, Json<OrganizationResponse>)> {
    let organization = state
        .organization_service
        .save_organization(
            &principal,
            OrganizationId::UNSCOPED,
            OrganizationDraft::try_from(payload)?,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(organization.into())))
}

pub async fn update_organization_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(organization_id): Path<i64>,
    Json(payload): Json<SaveOrganizationRequest>,
) -> ApiResult<Json<OrganizationResponse>> {
    let organization = state
        .organization_service
        .save_organization(
            &principal,
            OrganizationId::new(organization_id),
            OrganizationDraft::try_from(payload)?,
        )
        .await?;

    Ok(Json(organization.into()))
}
