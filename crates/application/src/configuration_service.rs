//! Configuration management use-cases.

use std::sync::Arc;

use orgportal_core::{AppError, AppResult, OrganizationId, Principal};
use orgportal_domain::access::{effective_organization_id, is_super_user, logged_in_user_id};
use orgportal_domain::{
    Configuration, ConfigurationDraft, ConfigurationId, ConfigurationKeyId,
    ConfigurationSortColumn, OrganizationScope, PageRequest, PaginatedList, SortDirection, UserId,
};
use tracing::info;

use crate::OrganizationSelectionService;
use crate::organization_service::require_administrator;
use crate::portal_ports::{
    ConfigurationKeyRef, ConfigurationListItem, ConfigurationListQuery, ConfigurationRepository,
    ConfigurationUpdate, NewConfiguration, PortalUserRepository,
};

/// Page and sort requested by the configuration listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigurationListRequest {
    /// One-based page index.
    pub page_index: u32,
    /// Sort column.
    pub sort_column: ConfigurationSortColumn,
    /// Sort direction.
    pub sort_direction: SortDirection,
}

/// One page of configurations with the sort state used to render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationListing {
    /// Requested rows.
    pub page: PaginatedList<ConfigurationListItem>,
    /// Scope the rows were filtered with.
    pub scope: OrganizationScope,
    /// Applied sort column.
    pub sort_column: ConfigurationSortColumn,
    /// Applied sort direction.
    pub sort_direction: SortDirection,
    /// Direction a column link should request next.
    pub toggled_direction: SortDirection,
}

/// Input for creating or updating a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveConfigurationInput {
    /// Existing configuration to update. `None` creates one.
    pub configuration_id: Option<ConfigurationId>,
    /// Dictionary entry to link on create. `None` creates an entry.
    pub key_id: Option<ConfigurationKeyId>,
    /// Organization used on create when the actor has none of their own.
    pub organization_id: OrganizationId,
    /// Validated key, value and notes.
    pub draft: ConfigurationDraft,
}

/// Application service for per-organization configuration values.
#[derive(Clone)]
pub struct ConfigurationService {
    configuration_repository: Arc<dyn ConfigurationRepository>,
    user_repository: Arc<dyn PortalUserRepository>,
    selection_service: OrganizationSelectionService,
    page_size: u32,
}

impl ConfigurationService {
    /// Creates a new configuration service.
    #[must_use]
    pub fn new(
        configuration_repository: Arc<dyn ConfigurationRepository>,
        user_repository: Arc<dyn PortalUserRepository>,
        selection_service: OrganizationSelectionService,
        page_size: u32,
    ) -> Self {
        Self {
            configuration_repository,
            user_repository,
            selection_service,
            page_size,
        }
    }

    /// Lists one page of configurations visible to the actor.
    pub async fn list_configurations(
        &self,
        actor: &Principal,
        request: ConfigurationListRequest,
    ) -> AppResult<ConfigurationListing> {
        require_administrator(actor)?;

        let scope = self.selection_service.scope_for(actor).await?;
        let organization_id = match scope {
            OrganizationScope::Unscoped => None,
            OrganizationScope::Organization(organization_id) => Some(organization_id),
            OrganizationScope::Denied => {
                return Err(AppError::Forbidden(
                    "administrator role is required".to_owned(),
                ));
            }
        };

        let page = PageRequest::new(request.page_index, self.page_size);
        let query = ConfigurationListQuery {
            organization_id,
            sort_column: request.sort_column,
            sort_direction: request.sort_direction,
            page,
        };
        let (items, total_count) = self.configuration_repository.list(&query).await?;

        Ok(ConfigurationListing {
            page: PaginatedList::new(items, total_count, page),
            scope,
            sort_column: request.sort_column,
            sort_direction: request.sort_direction,
            toggled_direction: request.sort_direction.toggled(),
        })
    }

    /// Returns one configuration the actor may see.
    pub async fn get_configuration(
        &self,
        actor: &Principal,
        configuration_id: ConfigurationId,
    ) -> AppResult<Configuration> {
        require_administrator(actor)?;

        let configuration = self.find_configuration(configuration_id).await?;
        ensure_same_organization(actor, &configuration)?;
        Ok(configuration)
    }

    /// Returns the organization pre-selected for a new configuration.
    pub async fn new_configuration_defaults(
        &self,
        actor: &Principal,
    ) -> AppResult<Option<OrganizationId>> {
        require_administrator(actor)?;

        let user_id = logged_in_user_id::<UserId>(Some(actor))?;
        Ok(self
            .selection_service
            .get_selected_organization(user_id)
            .await?
            .map(|organization| organization.id))
    }

    /// Creates or updates a configuration.
    pub async fn save_configuration(
        &self,
        actor: &Principal,
        input: SaveConfigurationInput,
    ) -> AppResult<Configuration> {
        require_administrator(actor)?;
        let actor_id = logged_in_user_id::<UserId>(Some(actor))?;

        match input.configuration_id {
            None => self.create_configuration(actor_id, input).await,
            Some(configuration_id) => {
                let existing = self.find_configuration(configuration_id).await?;
                ensure_same_organization(actor, &existing)?;

                let configuration = self
                    .configuration_repository
                    .update(
                        configuration_id,
                        ConfigurationUpdate {
                            draft: input.draft,
                            actor: actor_id,
                        },
                    )
                    .await?
                    .ok_or_else(|| configuration_not_found(configuration_id))?;
                info!(configuration_id, %actor_id, "configuration updated");
                Ok(configuration)
            }
        }
    }

    async fn create_configuration(
        &self,
        actor_id: UserId,
        input: SaveConfigurationInput,
    ) -> AppResult<Configuration> {
        let profile = self
            .user_repository
            .find_by_id(actor_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{actor_id}' does not exist")))?;

        let organization_id = profile
            .user
            .organization_id
            .unwrap_or(input.organization_id);
        if organization_id.is_unscoped() {
            return Err(AppError::Validation(
                "an organization is required".to_owned(),
            ));
        }

        let key = match input.key_id {
            Some(key_id) if key_id > 0 => ConfigurationKeyRef::Existing(key_id),
            _ => ConfigurationKeyRef::New,
        };

        let configuration = self
            .configuration_repository
            .create(NewConfiguration {
                organization_id,
                key,
                draft: input.draft,
                actor: actor_id,
            })
            .await?;
        info!(
            configuration_id = configuration.id,
            %organization_id,
            %actor_id,
            "configuration created"
        );
        Ok(configuration)
    }

    async fn find_configuration(
        &self,
        configuration_id: ConfigurationId,
    ) -> AppResult<Configuration> {
        self.configuration_repository
            .find_by_id(configuration_id)
            .await?
            .ok_or_else(|| configuration_not_found(configuration_id))
    }
}

fn ensure_same_organization(actor: &Principal, configuration: &Configuration) -> AppResult<()> {
    if is_super_user(actor) || configuration.organization_id == effective_organization_id(actor) {
        return Ok(());
    }

    Err(AppError::Forbidden(format!(
        "configuration '{}' belongs to another organization",
        configuration.id
    )))
}

fn configuration_not_found(configuration_id: ConfigurationId) -> AppError {
    AppError::NotFound(format!("configuration '{configuration_id}' does not exist"))
}
