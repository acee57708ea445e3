//! Access-scoping policy.
//!
//! Every administrative use-case derives the caller's scope through these
//! functions instead of inspecting role names or claims itself. The policy is
//! stateless: it only reads the request's [`Principal`]. The one piece of
//! cross-request memory, a SuperUser's selected organization, is passed in by
//! the caller.

use std::str::FromStr;

use orgportal_core::{
    AppError, AppResult, NAME_CLAIM, NAME_IDENTIFIER_CLAIM, ORGANIZATION_ID_CLAIM, OrganizationId,
    Principal, Role,
};
use serde::{Deserialize, Serialize};

use crate::PortalUser;

/// Organization scope a request operates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "organization_id", rename_all = "snake_case")]
pub enum OrganizationScope {
    /// Every organization is visible.
    Unscoped,
    /// Only the given organization is visible.
    Organization(OrganizationId),
    /// The caller has no administrative scope at all.
    Denied,
}

/// Returns true iff the principal holds the Admin role.
#[must_use]
pub fn is_admin(principal: &Principal) -> bool {
    principal.is_in_role(Role::Admin)
}

/// Returns true iff the principal holds the SuperUser role.
#[must_use]
pub fn is_super_user(principal: &Principal) -> bool {
    principal.is_in_role(Role::SuperUser)
}

/// Returns the organization an Admin is confined to.
///
/// Non-admins, and admins without a parsable `OrganizationId` claim, get
/// [`OrganizationId::UNSCOPED`].
#[must_use]
pub fn effective_organization_id(principal: &Principal) -> OrganizationId {
    admin_organization_claim(principal).unwrap_or(OrganizationId::UNSCOPED)
}

/// Decides whether the principal may view or edit the target user's record.
#[must_use]
pub fn has_permission(principal: &Principal, target_user: &PortalUser) -> bool {
    if is_super_user(principal) {
        return true;
    }

    match admin_organization_claim(principal) {
        Some(organization_id) => target_user.organization_id == Some(organization_id),
        None => false,
    }
}

/// Resolves the scope of a request.
///
/// `selected` is the SuperUser's cached organization selection, if any. It
/// is ignored for every other role.
#[must_use]
pub fn resolve_scope(principal: &Principal, selected: Option<OrganizationId>) -> OrganizationScope {
    if is_super_user(principal) {
        return selected
            .map(OrganizationScope::Organization)
            .unwrap_or(OrganizationScope::Unscoped);
    }

    if is_admin(principal) {
        return OrganizationScope::Organization(effective_organization_id(principal));
    }

    OrganizationScope::Denied
}

/// Returns whether the principal may reach administrative pages.
#[must_use]
pub fn can_administer(principal: &Principal) -> bool {
    is_admin(principal) || is_super_user(principal)
}

/// Returns whether the principal may grant the role to another user.
///
/// Only SuperUsers may create or promote SuperUsers.
#[must_use]
pub fn can_assign_role(principal: &Principal, role: Role) -> bool {
    match role {
        Role::SuperUser => is_super_user(principal),
        Role::Admin | Role::User => can_administer(principal),
    }
}

/// Returns the roles the principal may offer when creating or editing users.
#[must_use]
pub fn assignable_roles(principal: &Principal) -> Vec<Role> {
    Role::all()
        .iter()
        .copied()
        .filter(|role| can_assign_role(principal, *role))
        .collect()
}

/// Extracts the logged-in user id from the name-identifier claim.
///
/// Fails with [`AppError::InvalidArgument`] when no principal is supplied.
/// A missing or unparsable claim yields `T::default()`, which is zero for the
/// numeric id types.
pub fn logged_in_user_id<T>(principal: Option<&Principal>) -> AppResult<T>
where
    T: FromStr + Default,
{
    let principal = require_principal(principal)?;

    Ok(principal
        .find_first_value(NAME_IDENTIFIER_CLAIM)
        .and_then(|value| value.parse::<T>().ok())
        .unwrap_or_default())
}

/// Extracts the logged-in user name from the name claim.
pub fn logged_in_user_name(principal: Option<&Principal>) -> AppResult<Option<String>> {
    let principal = require_principal(principal)?;

    Ok(principal.find_first_value(NAME_CLAIM).map(ToOwned::to_owned))
}

/// Extracts the `OrganizationId` claim regardless of role.
pub fn logged_in_user_organization_id(principal: Option<&Principal>) -> AppResult<OrganizationId> {
    let principal = require_principal(principal)?;

    Ok(organization_claim(principal).unwrap_or(OrganizationId::UNSCOPED))
}

fn require_principal(principal: Option<&Principal>) -> AppResult<&Principal> {
    principal.ok_or_else(|| AppError::InvalidArgument("principal is required".to_owned()))
}

fn admin_organization_claim(principal: &Principal) -> Option<OrganizationId> {
    if !is_admin(principal) {
        return None;
    }

    organization_claim(principal)
}

fn organization_claim(principal: &Principal) -> Option<OrganizationId> {
    principal
        .find_first_value(ORGANIZATION_ID_CLAIM)
        .and_then(|value| value.parse::<OrganizationId>().ok())
}
