use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::dto::{PageMetaResponse, ScopeResponse};

/// Query string accepted by the configuration listing.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigurationListParams {
    pub page: Option<u32>,
    pub sort: Option<String>,
    pub direction: Option<String>,
}

/// API representation of a configuration value and its dictionary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/configuration-response.ts"
)]
pub struct ConfigurationResponse {
    #[ts(type = "number")]
    pub id: i64,
    #[ts(type = "number")]
    pub key_id: i64,
    pub key: String,
    pub default_value: String,
    pub value: String,
    pub notes: Option<String>,
    pub is_active: bool,
    pub is_encrypted: bool,
    #[ts(type = "number")]
    pub organization_id: i64,
    pub created_at: String,
    #[ts(type = "number")]
    pub created_by: i64,
    pub updated_at: Option<String>,
    #[ts(type = "number | null")]
    pub updated_by: Option<i64>,
}

/// One configuration listing row.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/configuration-list-item-response.ts"
)]
pub struct ConfigurationListItemResponse {
    pub configuration: ConfigurationResponse,
    pub organization_name: String,
    pub created_by_name: Option<String>,
}

/// One page of configurations plus the sort state used for column links.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/configuration-list-response.ts"
)]
pub struct ConfigurationListResponse {
    pub items: Vec<ConfigurationListItemResponse>,
    pub page: PageMetaResponse,
    pub scope: ScopeResponse,
    pub sort: String,
    pub direction: String,
    pub toggled_direction: String,
}

/// Values pre-filled on the new-configuration form.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/configuration-defaults-response.ts"
)]
pub struct ConfigurationDefaultsResponse {
    #[ts(type = "number | null")]
    pub organization_id: Option<i64>,
}

/// Incoming payload for configuration create and update.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/save-configuration-request.ts"
)]
pub struct SaveConfigurationRequest {
    /// Dictionary key to link on create. Missing or zero creates a new key.
    #[serde(default)]
    #[ts(type = "number | null")]
    pub key_id: Option<i64>,
    /// Organization used when the caller has none of their own.
    #[serde(default)]
    #[ts(type = "number | null")]
    pub organization_id: Option<i64>,
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub notes: Option<String>,
}
