//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_organization_selection_cache;
mod postgres_configuration_repository;
mod postgres_organization_repository;
mod postgres_portal_user_repository;

#[cfg(test)]
mod postgres_test_support;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_organization_selection_cache::InMemoryOrganizationSelectionCache;
pub use postgres_configuration_repository::PostgresConfigurationRepository;
pub use postgres_organization_repository::PostgresOrganizationRepository;
pub use postgres_portal_user_repository::PostgresPortalUserRepository;
