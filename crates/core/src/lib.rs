//! Shared primitives for all Rust crates in the organization portal.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::{
    Claim, NAME_CLAIM, NAME_IDENTIFIER_CLAIM, ORGANIZATION_ID_CLAIM, Principal, Role,
};

/// Result type used across portal crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Organization identifier, the partition key for configurations and users.
///
/// The value `0` never names a stored organization; it is the sentinel for
/// "unscoped or unknown" returned by the access policy.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct OrganizationId(i64);

impl OrganizationId {
    /// Sentinel for "no organization scope".
    pub const UNSCOPED: Self = Self(0);

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

    /// Returns true for the unscoped sentinel.
    #[must_use]
    pub const fn is_unscoped(&self) -> bool {
        self.0 == 0
    }
}

impl Display for OrganizationId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl FromStr for OrganizationId {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value.trim().parse::<i64>().map(Self).map_err(|error| {
            AppError::Validation(format!("invalid organization id '{value}': {error}"))
        })
    }
}

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// A required argument, such as the caller principal, was not supplied.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// User is not authenticated or not allowed to access a resource.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// User is authenticated but blocked by authorization policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Internal unexpected error, including persistence store failures.
    #[error("internal error: {0}")]
    Internal(String),
}
