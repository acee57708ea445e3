use std::sync::Arc;

use orgportal_application::{
    AuthService, ConfigurationRepository, ConfigurationService, OrganizationRepository,
    OrganizationSelectionCache, OrganizationSelectionService, OrganizationService,
    PasswordHasher, PortalUserRepository, UserAdminService,
};
use orgportal_infrastructure::{
    Argon2PasswordHasher, InMemoryOrganizationSelectionCache, PostgresConfigurationRepository,
    PostgresOrganizationRepository, PostgresPortalUserRepository,
};
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

struct PortalRepositories {
    organization_repository: Arc<dyn OrganizationRepository>,
    configuration_repository: Arc<dyn ConfigurationRepository>,
    user_repository: Arc<dyn PortalUserRepository>,
}

fn build_repository_set(pool: &PgPool) -> PortalRepositories {
    PortalRepositories {
        organization_repository: Arc::new(PostgresOrganizationRepository::new(pool.clone())),
        configuration_repository: Arc::new(PostgresConfigurationRepository::new(pool.clone())),
        user_repository: Arc::new(PostgresPortalUserRepository::new(pool.clone())),
    }
}

/// Wires the services over Postgres adapters and one process-wide selection cache.
pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let repositories = build_repository_set(&pool);
    let selection_cache: Arc<dyn OrganizationSelectionCache> =
        Arc::new(InMemoryOrganizationSelectionCache::new());
    let password_hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher::new());

    let selection_service = OrganizationSelectionService::new(
        selection_cache,
        repositories.organization_repository.clone(),
        repositories.user_repository.clone(),
    );

    AppState {
        organization_service: OrganizationService::new(
            repositories.organization_repository.clone(),
        ),
        configuration_service: ConfigurationService::new(
            repositories.configuration_repository,
            repositories.user_repository.clone(),
            selection_service.clone(),
            config.page_size,
        ),
        user_admin_service: UserAdminService::new(
            repositories.user_repository.clone(),
            password_hasher.clone(),
            config.page_size,
        ),
        auth_service: AuthService::new(
            repositories.user_repository,
            password_hasher,
            selection_service.clone(),
        ),
        selection_service,
        frontend_url: config.frontend_url.clone(),
    }
}
