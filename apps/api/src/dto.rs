mod auth;
mod common;
mod configurations;
mod organizations;
mod users;

pub use auth::{LoginRequest, LoginResponse, PrincipalResponse, ScopeResponse};
pub use common::{HealthResponse, PageMetaResponse};
pub use configurations::{
    ConfigurationDefaultsResponse, ConfigurationListItemResponse, ConfigurationListParams,
    ConfigurationListResponse, ConfigurationResponse, SaveConfigurationRequest,
};
pub use organizations::{
    OrganizationResponse, SaveOrganizationRequest, SelectOrganizationRequest,
    SelectedOrganizationResponse,
};
pub use users::{
    CreateUserRequest, UpdateUserRequest, UserListItemResponse, UserListParams, UserListResponse,
    UserResponse,
};
