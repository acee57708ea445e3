//! Domain entities, invariants and the access-scoping policy.

#![forbid(unsafe_code)]

pub mod access;
mod configuration;
mod organization;
mod pagination;
mod user;

pub use access::OrganizationScope;
pub use configuration::{
    Configuration, ConfigurationDraft, ConfigurationId, ConfigurationKey, ConfigurationKeyId,
    ConfigurationSortColumn, SortDirection,
};
pub use organization::{Organization, OrganizationDraft};
pub use pagination::{PageRequest, PaginatedList};
pub use user::{
    EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, PortalUser, UserId, UserSortOrder,
    validate_password,
};
