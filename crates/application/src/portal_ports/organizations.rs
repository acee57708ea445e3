use async_trait::async_trait;
use orgportal_core::{AppResult, OrganizationId};
use orgportal_domain::{Organization, OrganizationDraft, UserId};

/// Repository port for organizations.
///
/// Lookups return `None` for unknown ids instead of failing.
#[async_trait]
pub trait OrganizationRepository: Send + Sync {
    /// Finds an organization by id.
    async fn find_by_id(&self, organization_id: OrganizationId)
    -> AppResult<Option<Organization>>;

    /// Lists every organization ordered by id.
    async fn list_all(&self) -> AppResult<Vec<Organization>>;

    /// Creates an organization stamped with the acting user.
    async fn create(&self, draft: &OrganizationDraft, actor: UserId) -> AppResult<Organization>;

    /// Updates name and credentials. Returns `None` when the id is unknown.
    async fn update(
        &self,
        organization_id: OrganizationId,
        draft: &OrganizationDraft,
        actor: UserId,
    ) -> AppResult<Option<Organization>>;
}
