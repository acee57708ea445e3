//! Organization-selection cache service.
//!
//! Remembers which organization each user is acting as across requests.
//! SuperUsers switch organizations through it; everyone else falls back to
//! the organization linked to their user record.

use std::sync::Arc;

use orgportal_core::{AppError, AppResult, OrganizationId, Principal};
use orgportal_domain::access::{is_super_user, logged_in_user_id, resolve_scope};
use orgportal_domain::{Organization, OrganizationScope, UserId};
use tracing::{debug, info};

use crate::portal_ports::{OrganizationRepository, OrganizationSelectionCache, PortalUserRepository};

/// Application service over the process-wide selection cache.
#[derive(Clone)]
pub struct OrganizationSelectionService {
    cache: Arc<dyn OrganizationSelectionCache>,
    organization_repository: Arc<dyn OrganizationRepository>,
    user_repository: Arc<dyn PortalUserRepository>,
}

impl OrganizationSelectionService {
    /// Creates a new selection service around a shared cache.
    #[must_use]
    pub fn new(
        cache: Arc<dyn OrganizationSelectionCache>,
        organization_repository: Arc<dyn OrganizationRepository>,
        user_repository: Arc<dyn PortalUserRepository>,
    ) -> Self {
        Self {
            cache,
            organization_repository,
            user_repository,
        }
    }

    /// Returns the organization the user is currently acting as.
    ///
    /// A cached selection wins; a selection pointing at a deleted
    /// organization yields `None` rather than falling back. Without a
    /// selection the user's own organization is returned, if any.
    pub async fn get_selected_organization(
        &self,
        user_id: UserId,
    ) -> AppResult<Option<Organization>> {
        if let Some(organization_id) = self.cache.selected_organization(user_id).await? {
            debug!(%user_id, %organization_id, "resolved cached organization selection");
            return self.organization_repository.find_by_id(organization_id).await;
        }

        let profile = self.user_repository.find_by_id(user_id).await?;
        Ok(profile.and_then(|profile| profile.organization))
    }

    /// Records the user's selection, replacing any previous one.
    pub async fn set_selected_organization(
        &self,
        user_id: UserId,
        organization_id: OrganizationId,
    ) -> AppResult<()> {
        self.cache
            .select_organization(user_id, organization_id)
            .await?;
        info!(%user_id, %organization_id, "organization selected");
        Ok(())
    }

    /// Drops every cached selection.
    ///
    /// The whole map is wiped, not only `user_id`'s entry: any logout resets
    /// the selection of every signed-in SuperUser.
    pub async fn clear_cache(&self, user_id: UserId) -> AppResult<()> {
        self.cache.clear().await?;
        info!(%user_id, "organization selection cache cleared for all users");
        Ok(())
    }

    /// Returns every organization iff `user_id` names an existing user.
    ///
    /// No role check happens here; callers gate on SuperUser.
    pub async fn list_organizations_for_superuser(
        &self,
        user_id: UserId,
    ) -> AppResult<Option<Vec<Organization>>> {
        if self.user_repository.find_by_id(user_id).await?.is_none() {
            return Ok(None);
        }

        self.organization_repository.list_all().await.map(Some)
    }

    /// Resolves the organization scope of an authenticated request.
    pub async fn scope_for(&self, principal: &Principal) -> AppResult<OrganizationScope> {
        let selected = if is_super_user(principal) {
            let user_id = logged_in_user_id::<UserId>(Some(principal))?;
            self.get_selected_organization(user_id)
                .await?
                .map(|organization| organization.id)
        } else {
            None
        };

        Ok(resolve_scope(principal, selected))
    }

    /// Switches a SuperUser to an existing organization.
    pub async fn select_organization_for(
        &self,
        principal: &Principal,
        organization_id: OrganizationId,
    ) -> AppResult<Organization> {
        if !is_super_user(principal) {
            return Err(AppError::Forbidden(
                "only super users can switch organizations".to_owned(),
            ));
        }

        let organization = self
            .organization_repository
            .find_by_id(organization_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("organization '{organization_id}' does not exist"))
            })?;

        let user_id = logged_in_user_id::<UserId>(Some(principal))?;
        self.set_selected_organization(user_id, organization.id)
            .await?;

        Ok(organization)
    }

    /// Lists the organizations offered by the organization switcher.
    pub async fn switchable_organizations(
        &self,
        principal: &Principal,
    ) -> AppResult<Vec<Organization>> {
        if !is_super_user(principal) {
            return Err(AppError::Forbidden(
                "only super users can switch organizations".to_owned(),
            ));
        }

        let user_id = logged_in_user_id::<UserId>(Some(principal))?;
        self.list_organizations_for_superuser(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' does not exist")))
    }
}
