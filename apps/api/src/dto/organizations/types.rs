use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// API representation of an organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/organization-response.ts"
)]
pub struct OrganizationResponse {
    #[ts(type = "number")]
    pub id: i64,
    pub display_name: String,
    pub client_id: String,
    pub client_secret: String,
    pub show_users_all_files: bool,
    pub created_at: String,
    #[ts(type = "number")]
    pub created_by: i64,
    pub updated_at: Option<String>,
    #[ts(type = "number | null")]
    pub updated_by: Option<i64>,
}

/// Incoming payload for organization create and update.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-organization-request.ts"
)]
pub struct SaveOrganizationRequest {
    pub display_name: String,
    pub client_id: String,
    pub client_secret: String,
}

/// Incoming payload for the organization switcher.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/select-organization-request.ts"
)]
pub struct SelectOrganizationRequest {
    #[ts(type = "number")]
    pub organization_id: i64,
}

/// Organization the caller is currently acting as, if any.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/selected-organization-response.ts"
)]
pub struct SelectedOrganizationResponse {
    pub organization: Option<OrganizationResponse>,
}
