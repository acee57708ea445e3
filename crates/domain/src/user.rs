//! Portal user types and validation rules.

use std::str::FromStr;

use orgportal_core::{AppError, AppResult, OrganizationId, Role};
use serde::{Deserialize, Serialize};

/// Unique identifier for a portal user record.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wraps a raw database identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.trim().parse::<i64>().map(Self)
    }
}

/// Validated email address, also used as the login name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Creates a validated email address.
    ///
    /// Checks that exactly one `@` separates a non-empty local part from a
    /// domain containing a `.`, and that the address fits in 254 characters.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        let trimmed = value.trim().to_lowercase();

        if trimmed.is_empty() {
            return Err(AppError::Validation(
                "email address must not be empty".to_owned(),
            ));
        }

        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(AppError::Validation(
                "email address must contain an '@'".to_owned(),
            ));
        };

        if local.is_empty() || domain.contains('@') {
            return Err(AppError::Validation(
                "email address must contain exactly one '@' after a local part".to_owned(),
            ));
        }

        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(AppError::Validation(
                "email domain must contain at least one inner '.'".to_owned(),
            ));
        }

        if trimmed.len() > 254 {
            return Err(AppError::Validation(
                "email address must not exceed 254 characters".to_owned(),
            ));
        }

        Ok(Self(trimmed))
    }

    /// Returns the validated email string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Minimum accepted password length.
pub const PASSWORD_MIN_LENGTH: usize = 6;

/// Maximum accepted password length.
pub const PASSWORD_MAX_LENGTH: usize = 100;

/// Validates a new password and its confirmation.
pub fn validate_password(password: &str, confirmation: &str) -> AppResult<()> {
    let char_count = password.chars().count();

    if !(PASSWORD_MIN_LENGTH..=PASSWORD_MAX_LENGTH).contains(&char_count) {
        return Err(AppError::Validation(format!(
            "password must be at least {PASSWORD_MIN_LENGTH} and at most {PASSWORD_MAX_LENGTH} characters long"
        )));
    }

    if password != confirmation {
        return Err(AppError::Validation(
            "the password and confirmation password do not match".to_owned(),
        ));
    }

    Ok(())
}

/// A portal user as seen by administrative pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalUser {
    /// Stable user id.
    pub id: UserId,
    /// Login email.
    pub email: String,
    /// Organization the user belongs to. SuperUsers usually have none.
    pub organization_id: Option<OrganizationId>,
    /// Inactive users cannot sign in and are hidden from listings.
    pub is_active: bool,
    /// Roles granted to the user.
    pub roles: Vec<Role>,
}

impl PortalUser {
    /// Returns whether the user holds the role.
    #[must_use]
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Sort orders offered by the user listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSortOrder {
    /// Email ascending.
    #[default]
    Email,
    /// Email descending.
    EmailDesc,
    /// Id ascending.
    Id,
    /// Id descending.
    IdDesc,
}

impl UserSortOrder {
    /// Parses a transport value. Unknown or empty values fall back to email
    /// ascending.
    #[must_use]
    pub fn parse_lenient(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("email_desc") => Self::EmailDesc,
            Some("id") => Self::Id,
            Some("id_desc") => Self::IdDesc,
            _ => Self::Email,
        }
    }

    /// Returns the stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::EmailDesc => "email_desc",
            Self::Id => "id",
            Self::IdDesc => "id_desc",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_user_sort_falls_back_to_email() {
        assert_eq!(UserSortOrder::parse_lenient(None), UserSortOrder::Email);
        assert_eq!(
            UserSortOrder::parse_lenient(Some("id_desc")),
            UserSortOrder::IdDesc
        );
        assert_eq!(
            UserSortOrder::parse_lenient(Some("created")),
            UserSortOrder::Email
        );
    }

    #[test]
    fn valid_email_is_normalized() {
        let email = EmailAddress::new("  Admin@Example.COM ");
        assert_eq!(
            email.map(String::from).unwrap_or_default(),
            "admin@example.com"
        );
    }

    #[test]
    fn email_without_at_is_rejected() {
        assert!(EmailAddress::new("noatsign").is_err());
    }

    #[test]
    fn email_with_two_ats_is_rejected() {
        assert!(EmailAddress::new("a@b@example.com").is_err());
    }

    #[test]
    fn email_without_domain_dot_is_rejected() {
        assert!(EmailAddress::new("user@localhost").is_err());
    }

    #[test]
    fn short_password_is_rejected() {
        assert!(validate_password("abc", "abc").is_err());
    }

    #[test]
    fn mismatched_confirmation_is_rejected() {
        assert!(validate_password("secret-1", "secret-2").is_err());
    }

    #[test]
    fn boundary_lengths_are_accepted() {
        let shortest = "a".repeat(PASSWORD_MIN_LENGTH);
        let longest = "b".repeat(PASSWORD_MAX_LENGTH);
        assert!(validate_password(&shortest, &shortest).is_ok());
        assert!(validate_password(&longest, &longest).is_ok());
    }

    #[test]
    fn too_long_password_is_rejected() {
        let long = "c".repeat(PASSWORD_MAX_LENGTH + 1);
        assert!(validate_password(&long, &long).is_err());
    }

    #[test]
    fn user_id_parses_and_defaults_to_zero() {
        assert_eq!("15".parse::<UserId>().ok(), Some(UserId::new(15)));
        assert!("x".parse::<UserId>().is_err());
        assert_eq!(UserId::default().as_i64(), 0);
    }
}
