use orgportal_core::{NAME_CLAIM, Principal};
use orgportal_domain::OrganizationScope;
use orgportal_domain::access::{is_admin, is_super_user};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for email+password login.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/login-request.ts"
)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login status response.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/login-response.ts"
)]
pub struct LoginResponse {
    pub status: String,
}

/// Organization scope of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/scope-response.ts"
)]
pub struct ScopeResponse {
    /// One of `unscoped`, `organization` or `denied`.
    pub kind: String,
    #[ts(type = "number | null")]
    pub organization_id: Option<i64>,
}

impl From<OrganizationScope> for ScopeResponse {
    fn from(value: OrganizationScope) -> Self {
        match value {
            OrganizationScope::Unscoped => Self {
                kind: "unscoped".to_owned(),
                organization_id: None,
            },
            OrganizationScope::Organization(organization_id) => Self {
                kind: "organization".to_owned(),
                organization_id: Some(organization_id.as_i64()),
            },
            OrganizationScope::Denied => Self {
                kind: "denied".to_owned(),
                organization_id: None,
            },
        }
    }
}

/// API representation of the authenticated principal.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/principal-response.ts"
)]
pub struct PrincipalResponse {
    #[ts(type = "number")]
    pub user_id: i64,
    pub name: Option<String>,
    pub roles: Vec<String>,
    pub is_admin: bool,
    pub is_super_user: bool,
    pub scope: ScopeResponse,
}

impl PrincipalResponse {
    /// Creates a response from the session principal and its resolved scope.
    #[must_use]
    pub fn from_principal(principal: &Principal, user_id: i64, scope: OrganizationScope) -> Self {
        Self {
            user_id,
            name: principal.find_first_value(NAME_CLAIM).map(ToOwned::to_owned),
            roles: principal
                .roles()
                .map(|role| role.as_str().to_owned())
                .collect(),
            is_admin: is_admin(principal),
            is_super_user: is_super_user(principal),
            scope: scope.into(),
        }
    }
}
