use std::str::FromStr;

use chrono::{DateTime, Utc};
use orgportal_core::{AppError, AppResult, NonEmptyString, OrganizationId};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// Identifier of a configuration row.
pub type ConfigurationId = i64;

/// Identifier of a configuration dictionary entry.
pub type ConfigurationKeyId = i64;

/// Dictionary entry naming a configuration key and its default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationKey {
    /// Stable dictionary id.
    pub id: ConfigurationKeyId,
    /// Key name, for example `ThreadCount`.
    pub key: String,
    /// Value used when an organization has no override.
    pub default_value: String,
    /// Whether the key is in use.
    pub is_active: bool,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Whether values for this key are stored encrypted.
    pub is_encrypted: bool,
}

/// A per-organization configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    /// Stable configuration id.
    pub id: ConfigurationId,
    /// Dictionary entry this value belongs to.
    pub key: ConfigurationKey,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Configured value.
    pub value: String,
    /// Whether the value is in use.
    pub is_active: bool,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Creating user.
    pub created_by: UserId,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
    /// Last updating user.
    pub updated_by: Option<UserId>,
}

/// Validated key and value accepted on configuration create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationDraft {
    key: NonEmptyString,
    value: NonEmptyString,
    notes: Option<String>,
}

impl ConfigurationDraft {
    /// Validates that key and value are present. Blank notes become `None`.
    pub fn new(
        key: impl Into<String>,
        value: impl Into<String>,
        notes: Option<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            key: NonEmptyString::new(key)
                .map_err(|_| AppError::Validation("configuration key is required".to_owned()))?,
            value: NonEmptyString::new(value)
                .map_err(|_| AppError::Validation("configuration value is required".to_owned()))?,
            notes: notes.filter(|value| !value.trim().is_empty()),
        })
    }

    /// Returns the key name.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Returns the value.
    #[must_use]
    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    /// Returns the notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

/// Sort direction for listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    #[default]
    Desc,
}

impl SortDirection {
    /// Returns the SQL keyword.
    #[must_use]
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Returns the opposite direction, used for toggling column headers.
    #[must_use]
    pub fn toggled(&self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl FromStr for SortDirection {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(AppError::Validation(format!(
                "unknown sort direction '{value}'"
            ))),
        }
    }
}

/// Columns a configuration listing may be sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigurationSortColumn {
    /// Configuration id.
    #[default]
    Id,
    /// Dictionary key name.
    Key,
    /// Configured value.
    Value,
    /// Owning organization name.
    OrganizationName,
    /// Creation timestamp.
    CreateDate,
    /// Notes.
    Notes,
}

impl ConfigurationSortColumn {
    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Key => "key",
            Self::Value => "value",
            Self::OrganizationName => "organization_name",
            Self::CreateDate => "create_date",
            Self::Notes => "notes",
        }
    }
}

impl FromStr for ConfigurationSortColumn {
    type Err = AppError;

    /// Accepts snake_case values and the PascalCase column names used by
    /// older links, such as `OrganizationName`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().replace('_', "").to_ascii_lowercase();
        match normalized.as_str() {
            "id" => Ok(Self::Id),
            "key" => Ok(Self::Key),
            "value" => Ok(Self::Value),
            "organizationname" => Ok(Self::OrganizationName),
            "createdate" | "createat" => Ok(Self::CreateDate),
            "notes" => Ok(Self::Notes),
            _ => Err(AppError::Validation(format!(
                "unknown configuration sort column '{value}'"
            ))),
        }
    }
}
