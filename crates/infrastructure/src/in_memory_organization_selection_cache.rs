use std::collections::HashMap;

use async_trait::async_trait;
use orgportal_application::OrganizationSelectionCache;
use orgportal_core::{AppResult, OrganizationId};
use orgportal_domain::UserId;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory cache adapter for organization selections.
///
/// One instance is built at process start and shared by every request.
/// Entries live until the process exits or the cache is cleared.
#[derive(Default)]
pub struct InMemoryOrganizationSelectionCache {
    entries: RwLock<HashMap<UserId, OrganizationId>>,
}

impl InMemoryOrganizationSelectionCache {
    /// Creates an empty selection cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrganizationSelectionCache for InMemoryOrganizationSelectionCache {
    async fn selected_organization(&self, user_id: UserId) -> AppResult<Option<OrganizationId>> {
        Ok(self.entries.read().await.get(&user_id).copied())
    }

    async fn select_organization(
        &self,
        user_id: UserId,
        organization_id: OrganizationId,
    ) -> AppResult<()> {
        self.entries.write().await.insert(user_id, organization_id);
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        let cleared = entries.len();
        entries.clear();
        debug!(cleared, "organization selections dropped");
        Ok(())
    }
}
