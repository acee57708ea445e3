use orgportal_application::{
    AuthService, ConfigurationService, OrganizationSelectionService, OrganizationService,
    UserAdminService,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub selection_service: OrganizationSelectionService,
    pub organization_service: OrganizationService,
    pub configuration_service: ConfigurationService,
    pub user_admin_service: UserAdminService,
    pub auth_service: AuthService,
    pub frontend_url: String,
}
