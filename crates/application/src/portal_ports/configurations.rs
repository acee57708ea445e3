use async_trait::async_trait;
use orgportal_core::{AppResult, OrganizationId};
use orgportal_domain::{
    Configuration, ConfigurationDraft, ConfigurationId, ConfigurationKeyId,
    ConfigurationSortColumn, PageRequest, SortDirection, UserId,
};

/// Filter, sort and page for the configuration listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationListQuery {
    /// Restricts rows to one organization. `None` lists every organization.
    pub organization_id: Option<OrganizationId>,
    /// Sort column.
    pub sort_column: ConfigurationSortColumn,
    /// Sort direction.
    pub sort_direction: SortDirection,
    /// Requested page.
    pub page: PageRequest,
}

/// Configuration row joined with display columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationListItem {
    /// Stored configuration.
    pub configuration: Configuration,
    /// Display name of the owning organization.
    pub organization_name: String,
    /// Email of the creating user, when that user still exists.
    pub created_by_name: Option<String>,
}

/// Dictionary entry a new configuration links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigurationKeyRef {
    /// Link an existing dictionary entry.
    Existing(ConfigurationKeyId),
    /// Create a dictionary entry from the draft's key, value and notes.
    New,
}

/// Input for inserting a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConfiguration {
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Dictionary entry to link or create.
    pub key: ConfigurationKeyRef,
    /// Validated key, value and notes.
    pub draft: ConfigurationDraft,
    /// User stamped into the audit columns.
    pub actor: UserId,
}

/// Input for updating a configuration and renaming its dictionary key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationUpdate {
    /// Validated key, value and notes.
    pub draft: ConfigurationDraft,
    /// User stamped into the audit columns.
    pub actor: UserId,
}

/// Repository port for configurations and their dictionary entries.
#[async_trait]
pub trait ConfigurationRepository: Send + Sync {
    /// Lists one page of configurations and the total row count.
    async fn list(
        &self,
        query: &ConfigurationListQuery,
    ) -> AppResult<(Vec<ConfigurationListItem>, u64)>;

    /// Finds a configuration with its dictionary entry.
    async fn find_by_id(&self, configuration_id: ConfigurationId)
    -> AppResult<Option<Configuration>>;

    /// Inserts a configuration, creating its dictionary entry when requested.
    async fn create(&self, input: NewConfiguration) -> AppResult<Configuration>;

    /// Updates value, notes and the linked dictionary key. Returns `None`
    /// when the id is unknown.
    async fn update(
        &self,
        configuration_id: ConfigurationId,
        input: ConfigurationUpdate,
    ) -> AppResult<Option<Configuration>>;
}
