use async_trait::async_trait;
use orgportal_core::{AppResult, OrganizationId};
use orgportal_domain::UserId;

/// Process-wide map from user id to the organization that user acts as.
///
/// Implementations must be safe for concurrent use from many requests
/// without external locking. Each call is atomic on its own; there is no
/// ordering between racing writers beyond that.
#[async_trait]
pub trait OrganizationSelectionCache: Send + Sync {
    /// Returns the cached selection for a user.
    async fn selected_organization(&self, user_id: UserId) -> AppResult<Option<OrganizationId>>;

    /// Inserts or replaces the selection for a user.
    async fn select_organization(
        &self,
        user_id: UserId,
        organization_id: OrganizationId,
    ) -> AppResult<()>;

    /// Removes every user's selection.
    async fn clear(&self) -> AppResult<()>;
}
