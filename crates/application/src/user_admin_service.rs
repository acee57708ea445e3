//! Portal user administration use-cases.
//!
//! Admins manage users of their own organization; SuperUsers manage every
//! user and are the only ones who may create or promote SuperUsers.

use std::sync::Arc;

use orgportal_core::{AppError, AppResult, OrganizationId, Principal, Role};
use orgportal_domain::access::{
    assignable_roles, can_assign_role, effective_organization_id, has_permission, is_super_user,
    logged_in_user_id,
};
use orgportal_domain::{
    EmailAddress, PageRequest, PaginatedList, PortalUser, UserId, UserSortOrder, validate_password,
};
use tracing::info;

use crate::organization_service::require_administrator;
use crate::portal_ports::{
    NewPortalUser, PasswordHasher, PortalUserRepository, PortalUserUpdate, UserListItem,
    UserListQuery, UserProfile,
};

/// Page, search and sort requested by the user listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserListRequest {
    /// One-based page index.
    pub page_index: u32,
    /// Case-insensitive email substring.
    pub email_search: Option<String>,
    /// Sort order.
    pub sort: UserSortOrder,
}

/// New password and its confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordReset {
    /// Plaintext password.
    pub password: String,
    /// Must equal `password`.
    pub confirmation: String,
}

/// Input for editing a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateUserInput {
    /// Requested organization. Ignored for Admin actors.
    pub organization_id: Option<OrganizationId>,
    /// Whether the account may sign in.
    pub is_active: bool,
    /// Replacement role set.
    pub roles: Vec<Role>,
    /// Optional password reset.
    pub password_reset: Option<PasswordReset>,
}

/// Input for creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserInput {
    /// Email, also the login name.
    pub email: String,
    /// Initial password and confirmation.
    pub password: PasswordReset,
    /// Requested organization. Ignored for Admin actors.
    pub organization_id: OrganizationId,
    /// Requested roles.
    pub roles: Vec<Role>,
    /// Creates a SuperUser without organization instead.
    pub create_super_user: bool,
}

/// Application service for portal user administration.
#[derive(Clone)]
pub struct UserAdminService {
    user_repository: Arc<dyn PortalUserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    page_size: u32,
}

impl UserAdminService {
    /// Creates a new user administration service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn PortalUserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        page_size: u32,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            page_size,
        }
    }

    /// Lists one page of active users visible to the actor.
    pub async fn list_users(
        &self,
        actor: &Principal,
        request: UserListRequest,
    ) -> AppResult<PaginatedList<UserListItem>> {
        require_administrator(actor)?;

        let organization_id = if is_super_user(actor) {
            None
        } else {
            Some(effective_organization_id(actor))
        };
        let email_search = request
            .email_search
            .map(|search| search.trim().to_owned())
            .filter(|search| !search.is_empty());

        let page = PageRequest::new(request.page_index, self.page_size);
        let (items, total_count) = self
            .user_repository
            .list_active(&UserListQuery {
                organization_id,
                email_search,
                sort: request.sort,
                page,
            })
            .await?;

        Ok(PaginatedList::new(items, total_count, page))
    }

    /// Returns a user the actor may manage.
    pub async fn get_user(&self, actor: &Principal, user_id: UserId) -> AppResult<UserProfile> {
        require_administrator(actor)?;

        let profile = self.find_profile(user_id).await?;
        ensure_permission(actor, &profile.user)?;
        Ok(profile)
    }

    /// Updates organization, activation, roles and optionally the password.
    pub async fn update_user(
        &self,
        actor: &Principal,
        user_id: UserId,
        input: UpdateUserInput,
    ) -> AppResult<PortalUser> {
        require_administrator(actor)?;

        let profile = self.find_profile(user_id).await?;
        ensure_permission(actor, &profile.user)?;
        ensure_assignable(actor, &input.roles)?;

        let organization_id = if is_super_user(actor) {
            input.organization_id
        } else {
            Some(effective_organization_id(actor))
        };

        let password_hash = match input.password_reset {
            Some(reset) => {
                validate_password(&reset.password, &reset.confirmation)?;
                Some(self.password_hasher.hash_password(&reset.password)?)
            }
            None => None,
        };
        let password_changed = password_hash.is_some();

        let user = self
            .user_repository
            .update(
                user_id,
                PortalUserUpdate {
                    organization_id,
                    is_active: input.is_active,
                    roles: dedup_roles(input.roles),
                    password_hash,
                },
            )
            .await?
            .ok_or_else(|| user_not_found(user_id))?;

        let actor_id = logged_in_user_id::<UserId>(Some(actor))?;
        info!(%user_id, %actor_id, password_changed, "portal user updated");
        Ok(user)
    }

    /// Creates a portal user.
    pub async fn create_user(
        &self,
        actor: &Principal,
        input: CreateUserInput,
    ) -> AppResult<PortalUser> {
        require_administrator(actor)?;

        let (organization_id, roles) = if input.create_super_user {
            if !is_super_user(actor) {
                return Err(AppError::Forbidden(
                    "only super users can create super users".to_owned(),
                ));
            }
            (None, vec![Role::SuperUser])
        } else {
            ensure_assignable(actor, &input.roles)?;
            if input.roles.contains(&Role::SuperUser) {
                return Err(AppError::Validation(
                    "super users are created without an organization".to_owned(),
                ));
            }

            let organization_id = if is_super_user(actor) {
                input.organization_id
            } else {
                effective_organization_id(actor)
            };
            if organization_id.as_i64() < 1 {
                return Err(AppError::Validation(
                    "an organization is required".to_owned(),
                ));
            }
            (Some(organization_id), dedup_roles(input.roles))
        };

        let email = EmailAddress::new(input.email)?;
        validate_password(&input.password.password, &input.password.confirmation)?;
        let password_hash = self
            .password_hasher
            .hash_password(&input.password.password)?;

        let user = self
            .user_repository
            .create(NewPortalUser {
                email,
                password_hash,
                organization_id,
                roles,
            })
            .await?;

        let actor_id = logged_in_user_id::<UserId>(Some(actor))?;
        info!(user_id = %user.id, %actor_id, "portal user created");
        Ok(user)
    }

    /// Returns the roles the actor may grant.
    pub fn assignable_roles(&self, actor: &Principal) -> AppResult<Vec<Role>> {
        require_administrator(actor)?;
        Ok(assignable_roles(actor))
    }

    async fn find_profile(&self, user_id: UserId) -> AppResult<UserProfile> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| user_not_found(user_id))
    }
}

fn ensure_permission(actor: &Principal, user: &PortalUser) -> AppResult<()> {
    if has_permission(actor, user) {
        return Ok(());
    }

    Err(AppError::Forbidden(format!(
        "user '{}' belongs to another organization",
        user.id
    )))
}

fn ensure_assignable(actor: &Principal, roles: &[Role]) -> AppResult<()> {
    match roles.iter().find(|role| !can_assign_role(actor, **role)) {
        Some(role) => Err(AppError::Forbidden(format!(
            "role '{role}' cannot be assigned by this user"
        ))),
        None => Ok(()),
    }
}

fn dedup_roles(mut roles: Vec<Role>) -> Vec<Role> {
    roles.sort_unstable();
    roles.dedup();
    roles
}

fn user_not_found(user_id: UserId) -> AppError {
    AppError::NotFound(format!("user '{user_id}' does not exist"))
}

#[cfg(test)]
mod tests;
