use orgportal_application::{
    ConfigurationListItem, ConfigurationListRequest, ConfigurationListing, SaveConfigurationInput,
};
use orgportal_core::{AppError, OrganizationId};
use orgportal_domain::{Configuration, ConfigurationDraft, ConfigurationId};

use super::types::{
    ConfigurationListItemResponse, ConfigurationListParams, ConfigurationListResponse,
    ConfigurationResponse, SaveConfigurationRequest,
};
use crate::dto::PageMetaResponse;

impl From<Configuration> for ConfigurationResponse {
    fn from(value: Configuration) -> Self {
        Self {
            id: value.id,
            key_id: value.key.id,
            key: value.key.key,
            default_value: value.key.default_value,
            value: value.value,
            notes: value.notes,
            is_active: value.is_active,
            is_encrypted: value.key.is_encrypted,
            organization_id: value.organization_id.as_i64(),
            created_at: value.created_at.to_rfc3339(),
            created_by: value.created_by.as_i64(),
            updated_at: value.updated_at.map(|updated_at| updated_at.to_rfc3339()),
            updated_by: value.updated_by.map(|updated_by| updated_by.as_i64()),
        }
    }
}

impl From<ConfigurationListItem> for ConfigurationListItemResponse {
    fn from(value: ConfigurationListItem) -> Self {
        Self {
            configuration: value.configuration.into(),
            organization_name: value.organization_name,
            created_by_name: value.created_by_name,
        }
    }
}

impl From<ConfigurationListing> for ConfigurationListResponse {
    fn from(value: ConfigurationListing) -> Self {
        let page = PageMetaResponse::from(&value.page);
        Self {
            items: value
                .page
                .into_items()
                .into_iter()
                .map(ConfigurationListItemResponse::from)
                .collect(),
            page,
            scope: value.scope.into(),
            sort: value.sort_column.as_str().to_owned(),
            direction: value.sort_direction.as_sql().to_ascii_lowercase(),
            toggled_direction: value.toggled_direction.as_sql().to_ascii_lowercase(),
        }
    }
}

impl TryFrom<ConfigurationListParams> for ConfigurationListRequest {
    type Error = AppError;

    fn try_from(value: ConfigurationListParams) -> Result<Self, Self::Error> {
        let sort_column = match value.sort.as_deref().filter(|sort| !sort.trim().is_empty()) {
            Some(sort) => sort.parse()?,
            None => Default::default(),
        };
        let sort_direction = match value
            .direction
            .as_deref()
            .filter(|direction| !direction.trim().is_empty())
        {
            Some(direction) => direction.parse()?,
            None => Default::default(),
        };

        Ok(Self {
            page_index: value.page.unwrap_or(1),
            sort_column,
            sort_direction,
        })
    }
}

impl SaveConfigurationRequest {
    /// Validates the payload. `configuration_id` is `None` on create.
    pub fn into_input(
        self,
        configuration_id: Option<ConfigurationId>,
    ) -> Result<SaveConfigurationInput, AppError> {
        Ok(SaveConfigurationInput {
            configuration_id,
            key_id: self.key_id,
            organization_id: self
                .organization_id
                .map(OrganizationId::new)
                .unwrap_or(OrganizationId::UNSCOPED),
            draft: ConfigurationDraft::new(self.key, self.value, self.notes)?,
        })
    }
}
