use chrono::{DateTime, Utc};
use orgportal_core::{AppResult, NonEmptyString, OrganizationId};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// An organization managed by the portal.
///
/// The client id and secret are credentials for the organization's external
/// integration and are only stored here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Stable organization id.
    pub id: OrganizationId,
    /// Human-readable name.
    pub display_name: String,
    /// Integration client id.
    pub client_id: String,
    /// Integration client secret.
    pub client_secret: String,
    /// Whether the organization's users may see all uploaded files.
    pub show_users_all_files: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// User that created the organization.
    pub created_by: UserId,
    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
    /// User that last updated the organization.
    pub updated_by: Option<UserId>,
}

/// Validated organization fields accepted on create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationDraft {
    display_name: NonEmptyString,
    client_id: NonEmptyString,
    client_secret: NonEmptyString,
}

impl OrganizationDraft {
    /// Validates that name and credentials are present.
    pub fn new(
        display_name: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            display_name: NonEmptyString::new(display_name)
                .map_err(|_| validation("please provide an organization name"))?,
            client_id: NonEmptyString::new(client_id)
                .map_err(|_| validation("please provide a client id"))?,
            client_secret: NonEmptyString::new(client_secret)
                .map_err(|_| validation("please provide a client secret"))?,
        })
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the client id.
    #[must_use]
    pub fn client_id(&self) -> &str {
        self.client_id.as_str()
    }

    /// Returns the client secret.
    #[must_use]
    pub fn client_secret(&self) -> &str {
        self.client_secret.as_str()
    }
}

fn validation(message: &str) -> orgportal_core::AppError {
    orgportal_core::AppError::Validation(message.to_owned())
}

#[cfg(test)]
mod tests {
    use super::OrganizationDraft;

    #[test]
    fn draft_requires_every_field() {
        assert!(OrganizationDraft::new("Acme", "client", "secret").is_ok());
        assert!(OrganizationDraft::new(" ", "client", "secret").is_err());
        assert!(OrganizationDraft::new("Acme", "", "secret").is_err());
        assert!(OrganizationDraft::new("Acme", "client", "\t").is_err());
    }
}
