//! Organization management use-cases.

use std::sync::Arc;

use orgportal_core::{AppError, AppResult, OrganizationId, Principal};
use orgportal_domain::access::{can_administer, logged_in_user_id};
use orgportal_domain::{Organization, OrganizationDraft, UserId};
use tracing::info;

use crate::portal_ports::OrganizationRepository;

/// Application service for listing and editing organizations.
#[derive(Clone)]
pub struct OrganizationService {
    organization_repository: Arc<dyn OrganizationRepository>,
}

impl OrganizationService {
    /// Creates a new organization service.
    #[must_use]
    pub fn new(organization_repository: Arc<dyn OrganizationRepository>) -> Self {
        Self {
            organization_repository,
        }
    }

    /// Lists every organization.
    pub async fn list_organizations(&self, actor: &Principal) -> AppResult<Vec<Organization>> {
        require_administrator(actor)?;
        self.organization_repository.list_all().await
    }

    /// Returns one organization.
    pub async fn get_organization(
        &self,
        actor: &Principal,
        organization_id: OrganizationId,
    ) -> AppResult<Organization> {
        require_administrator(actor)?;
        self.organization_repository
            .find_by_id(organization_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("organization '{organization_id}' does not exist"))
            })
    }

    /// Creates the organization when `organization_id` is the unscoped
    /// sentinel, otherwise updates it.
    pub async fn save_organization(
        &self,
        actor: &Principal,
        organization_id: OrganizationId,
        draft: OrganizationDraft,
    ) -> AppResult<Organization> {
        require_administrator(actor)?;
        let actor_id = logged_in_user_id::<UserId>(Some(actor))?;

        if organization_id.is_unscoped() {
            let organization = self.organization_repository.create(&draft, actor_id).await?;
            info!(organization_id = %organization.id, %actor_id, "organization created");
            return Ok(organization);
        }

        let organization = self
            .organization_repository
            .update(organization_id, &draft, actor_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("organization '{organization_id}' does not exist"))
            })?;
        info!(%organization_id, %actor_id, "organization updated");
        Ok(organization)
    }
}

pub(crate) fn require_administrator(actor: &Principal) -> AppResult<()> {
    if can_administer(actor) {
        return Ok(());
    }

    Err(AppError::Forbidden(
        "administrator role is required".to_owned(),
    ))
}
