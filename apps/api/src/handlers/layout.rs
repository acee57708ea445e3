//! Organization switcher shown in the portal layout.

use axum::Json;
use axum::extract::{Extension, State};
use orgportal_core::{OrganizationId, Principal};
use orgportal_domain::UserId;
use orgportal_domain::access::logged_in_user_id;

use crate::dto::{OrganizationResponse, SelectOrganizationRequest, SelectedOrganizationResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn selected_organization_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<SelectedOrganizationResponse>> {
    let user_id = logged_in_user_id::<UserId>(Some(&principal))?;
    let organization = state
        .selection_service
        .get_selected_organization(user_id)
        .await?;

    Ok(Json(SelectedOrganizationResponse {
        organization: organization.map(OrganizationResponse::from),
    }))
}

pub async fn select_organization_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<SelectOrganizationRequest>,
) -> ApiResult<Json<SelectedOrganizationResponse>> {
    let organization = state
        .selection_service
        .select_organization_for(&principal, OrganizationId::new(payload.organization_id))
        .await?;

    Ok(Json(SelectedOrganizationResponse {
        organization: Some(organization.into()),
    }))
}

pub async fn switchable_organizations_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<OrganizationResponse>>> {
    let organizations = state
        .selection_service
        .switchable_organizations(&principal)
        .await?
        .into_iter()
        .map(OrganizationResponse::from)
        .collect();

    Ok(Json(organizations))
}
