use orgportal_application::{
    CreateUserInput, PasswordReset, UpdateUserInput, UserListItem, UserListRequest, UserProfile,
};
use orgportal_core::{AppError, OrganizationId, Role};
use orgportal_domain::{PaginatedList, PortalUser, UserSortOrder};

use super::types::{
    CreateUserRequest, UpdateUserRequest, UserListItemResponse, UserListParams, UserListResponse,
    UserResponse,
};
use crate::dto::PageMetaResponse;

/// Decodes transport role names, rejecting unknown ones.
fn parse_roles(names: &[String]) -> Result<Vec<Role>, AppError> {
    names.iter().map(|name| name.parse::<Role>()).collect()
}

fn role_names(roles: &[Role]) -> Vec<String> {
    roles.iter().map(|role| role.as_str().to_owned()).collect()
}

impl From<PortalUser> for UserResponse {
    fn from(value: PortalUser) -> Self {
        Self {
            id: value.id.as_i64(),
            email: value.email,
            organization_id: value
                .organization_id
                .map(|organization_id| organization_id.as_i64()),
            organization_name: None,
            is_active: value.is_active,
            roles: role_names(&value.roles),
        }
    }
}

impl From<UserProfile> for UserResponse {
    fn from(value: UserProfile) -> Self {
        Self {
            organization_name: value
                .organization
                .map(|organization| organization.display_name),
            ..Self::from(value.user)
        }
    }
}

impl From<UserListItem> for UserListItemResponse {
    fn from(value: UserListItem) -> Self {
        Self {
            role_names: value.role_names(),
            id: value.user.id.as_i64(),
            email: value.user.email,
            organization_name: value.organization_name,
        }
    }
}

impl UserListResponse {
    /// Creates a response from one listing page and the applied sort order.
    #[must_use]
    pub fn from_page(page: PaginatedList<UserListItem>, sort: UserSortOrder) -> Self {
        Self {
            page: PageMetaResponse::from(&page),
            items: page
                .into_items()
                .into_iter()
                .map(UserListItemResponse::from)
                .collect(),
            sort: sort.as_str().to_owned(),
        }
    }
}

impl From<UserListParams> for UserListRequest {
    fn from(value: UserListParams) -> Self {
        Self {
            page_index: value.page.unwrap_or(1),
            email_search: value.search,
            sort: UserSortOrder::parse_lenient(value.sort.as_deref()),
        }
    }
}

fn password_reset(
    password: Option<String>,
    confirmation: Option<String>,
) -> Option<PasswordReset> {
    password
        .filter(|password| !password.is_empty())
        .map(|password| PasswordReset {
            password,
            confirmation: confirmation.unwrap_or_default(),
        })
}

impl TryFrom<UpdateUserRequest> for UpdateUserInput {
    type Error = AppError;

    fn try_from(value: UpdateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            organization_id: value.organization_id.map(OrganizationId::new),
            is_active: value.is_active,
            roles: parse_roles(&value.roles)?,
            password_reset: password_reset(value.password, value.password_confirmation),
        })
    }
}

impl TryFrom<CreateUserRequest> for CreateUserInput {
    type Error = AppError;

    fn try_from(value: CreateUserRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            roles: parse_roles(&value.roles)?,
            email: value.email,
            password: PasswordReset {
                password: value.password,
                confirmation: value.password_confirmation,
            },
            organization_id: value
                .organization_id
                .map(OrganizationId::new)
                .unwrap_or(OrganizationId::UNSCOPED),
            create_super_user: value.create_super_user,
        })
    }
}

#[cfg(test)]
mod tests {
    use orgportal_application::{UpdateUserInput, UserListItem, UserListRequest};
    use orgportal_core::{AppError, OrganizationId, Role};
    use orgportal_domain::{PortalUser, UserId, UserSortOrder};

    use super::{UpdateUserRequest, UserListItemResponse, UserListParams, parse_roles};

    #[test]
    fn role_names_decode_case_insensitively() -> Result<(), AppError> {
        let roles = parse_roles(&["ADMIN".to_owned(), "user".to_owned()])?;

        assert_eq!(roles, vec![Role::Admin, Role::User]);
        assert!(matches!(
            parse_roles(&["Owner".to_owned()]),
            Err(AppError::Validation(_))
        ));
        Ok(())
    }

    #[test]
    fn blank_password_keeps_current_one() -> Result<(), AppError> {
        let input = UpdateUserInput::try_from(UpdateUserRequest {
            organization_id: Some(2),
            is_active: true,
            roles: vec!["User".to_owned()],
            password: Some(String::new()),
            password_confirmation: Some(String::new()),
        })?;

        assert_eq!(input.organization_id, Some(OrganizationId::new(2)));
        assert_eq!(input.password_reset, None);
        Ok(())
    }

    #[test]
    fn unknown_user_sort_falls_back_to_email() {
        let request = UserListRequest::from(UserListParams {
            page: None,
            search: Some("acme".to_owned()),
            sort: Some("created".to_owned()),
        });

        assert_eq!(request.page_index, 1);
        assert_eq!(request.sort, UserSortOrder::Email);
        assert_eq!(request.email_search.as_deref(), Some("acme"));
    }

    #[test]
    fn list_row_joins_sorted_role_names() {
        let item = UserListItem {
            user: PortalUser {
                id: UserId::new(5),
                email: "ops@example.com".to_owned(),
                organization_id: Some(OrganizationId::new(1)),
                is_active: true,
                roles: vec![Role::User, Role::Admin],
            },
            organization_name: Some("Acme".to_owned()),
        };

        let response = UserListItemResponse::from(item);

        assert_eq!(response.role_names, "Admin,User");
        assert_eq!(response.organization_name.as_deref(), Some("Acme"));
    }
}
