use orgportal_core::AppError;
use orgportal_domain::{Organization, OrganizationDraft};

use super::types::{OrganizationResponse, SaveOrganizationRequest};

impl From<Organization> for OrganizationResponse {
    fn from(value: Organization) -> Self {
        Self {
            id: value.id.as_i64(),
            display_name: value.display_name,
            client_id: value.client_id,
            client_secret: value.client_secret,
            show_users_all_files: value.show_users_all_files,
            created_at: value.created_at.to_rfc3339(),
            created_by: value.created_by.as_i64(),
            updated_at: value.updated_at.map(|updated_at| updated_at.to_rfc3339()),
            updated_by: value.updated_by.map(|updated_by| updated_by.as_i64()),
        }
    }
}

impl TryFrom<SaveOrganizationRequest> for OrganizationDraft {
    type Error = AppError;

    fn try_from(value: SaveOrganizationRequest) -> Result<Self, Self::Error> {
        OrganizationDraft::new(value.display_name, value.client_id, value.client_secret)
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use orgportal_core::{AppError, OrganizationId};
    use orgportal_domain::{Organization, OrganizationDraft, UserId};

    use super::{OrganizationResponse, SaveOrganizationRequest};

    #[test]
    fn organization_response_formats_audit_columns() {
        let Some(created_at) = DateTime::from_timestamp(1_709_281_800, 0) else {
            panic!("timestamp out of range");
        };
        let organization = Organization {
            id: OrganizationId::new(4),
            display_name: "Northwind".to_owned(),
            client_id: "northwind-client".to_owned(),
            client_secret: "s3cret".to_owned(),
            show_users_all_files: false,
            created_at,
            created_by: UserId::new(1),
            updated_at: None,
            updated_by: None,
        };

        let response = OrganizationResponse::from(organization);

        assert_eq!(response.id, 4);
        assert_eq!(response.created_at, "2024-03-01T08:30:00+00:00");
        assert_eq!(response.updated_at, None);
    }

    #[test]
    fn blank_organization_name_is_rejected() {
        let result = OrganizationDraft::try_from(SaveOrganizationRequest {
            display_name: "  ".to_owned(),
            client_id: "client".to_owned(),
            client_secret: "secret".to_owned(),
        });

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
