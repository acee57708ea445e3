mod cache;
mod configurations;
mod organizations;
mod users;

pub use cache::OrganizationSelectionCache;
pub use configurations::{
    ConfigurationKeyRef, ConfigurationListItem, ConfigurationListQuery, ConfigurationRepository,
    ConfigurationUpdate, NewConfiguration,
};
pub use organizations::OrganizationRepository;
pub use users::{
    NewPortalUser, PasswordHasher, PortalUserRepository, PortalUserUpdate, UserCredentials,
    UserListItem, UserListQuery, UserProfile,
};
