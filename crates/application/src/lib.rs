//! Application services and ports.

#![forbid(unsafe_code)]

mod auth_service;
mod configuration_service;
mod organization_selection_service;
mod organization_service;
pub mod portal_ports;
mod user_admin_service;

#[cfg(test)]
mod test_fakes;

pub use auth_service::{AuthOutcome, AuthService, principal_for};
pub use configuration_service::{
    ConfigurationListRequest, ConfigurationListing, ConfigurationService, SaveConfigurationInput,
};
pub use organization_selection_service::OrganizationSelectionService;
pub use organization_service::OrganizationService;
pub use portal_ports::{
    ConfigurationKeyRef, ConfigurationListItem, ConfigurationListQuery, ConfigurationRepository,
    ConfigurationUpdate, NewConfiguration, NewPortalUser, OrganizationRepository,
    OrganizationSelectionCache, PasswordHasher, PortalUserRepository, PortalUserUpdate,
    UserCredentials, UserListItem, UserListQuery, UserProfile,
};
pub use user_admin_service::{
    CreateUserInput, PasswordReset, UpdateUserInput, UserAdminService, UserListRequest,
};
