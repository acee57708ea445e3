use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::dto::PageMetaResponse;

/// Query string accepted by the user listing.
#[derive(Debug, Default, Deserialize)]
pub struct UserListParams {
    pub page: Option<u32>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

/// API representation of a portal user.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-response.ts"
)]
pub struct UserResponse {
    #[ts(type = "number")]
    pub id: i64,
    pub email: String,
    #[ts(type = "number | null")]
    pub organization_id: Option<i64>,
    pub organization_name: Option<String>,
    pub is_active: bool,
    pub roles: Vec<String>,
}

/// One user listing row.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-list-item-response.ts"
)]
pub struct UserListItemResponse {
    #[ts(type = "number")]
    pub id: i64,
    pub email: String,
    pub organization_name: Option<String>,
    /// Sorted role names joined with commas.
    pub role_names: String,
}

/// One page of users.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/user-list-response.ts"
)]
pub struct UserListResponse {
    pub items: Vec<UserListItemResponse>,
    pub page: PageMetaResponse,
    pub sort: String,
}

/// Incoming payload for user edits.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/update-user-request.ts"
)]
pub struct UpdateUserRequest {
    #[serde(default)]
    #[ts(type = "number | null")]
    pub organization_id: Option<i64>,
    pub is_active: bool,
    #[serde(default)]
    pub roles: Vec<String>,
    /// New password. Blank keeps the current one.
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub password_confirmation: Option<String>,
}

/// Incoming payload for user creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/create-user-request.ts"
)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    #[serde(default)]
    #[ts(type = "number | null")]
    pub organization_id: Option<i64>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub create_super_user: bool,
}
