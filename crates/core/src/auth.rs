use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::AppError;

/// Claim type carrying the stable numeric user id.
pub const NAME_IDENTIFIER_CLAIM: &str = "nameidentifier";

/// Claim type carrying the login name (the user's email).
pub const NAME_CLAIM: &str = "name";

/// Claim type carrying an Admin's organization id.
pub const ORGANIZATION_ID_CLAIM: &str = "OrganizationId";

/// Portal roles. Decoded once when a principal is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Ordinary user without administrative pages.
    User,
    /// Administrator confined to a single organization.
    Admin,
    /// Portal-wide administrator that may act as any organization.
    SuperUser,
}

impl Role {
    /// Returns the stable role name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Admin => "Admin",
            Self::SuperUser => "SuperUser",
        }
    }

    /// Returns all known roles.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[Role::User, Role::Admin, Role::SuperUser];

        ALL
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    /// Role names are matched case-insensitively, so normalized upper-case
    /// names coming from form posts decode as well.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|role| role.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| AppError::Validation(format!("unknown role '{value}'")))
    }
}

/// A type/value string pair attached to an authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    claim_type: String,
    value: String,
}

impl Claim {
    /// Creates a claim.
    #[must_use]
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }

    /// Returns the claim type.
    #[must_use]
    pub fn claim_type(&self) -> &str {
        self.claim_type.as_str()
    }

    /// Returns the raw claim value.
    #[must_use]
    pub fn value(&self) -> &str {
        self.value.as_str()
    }
}

/// The authenticated caller of a request, persisted in the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    roles: BTreeSet<Role>,
    claims: Vec<Claim>,
}

impl Principal {
    /// Creates a principal from decoded roles and raw claims.
    #[must_use]
    pub fn new(roles: impl IntoIterator<Item = Role>, claims: Vec<Claim>) -> Self {
        Self {
            roles: roles.into_iter().collect(),
            claims,
        }
    }

    /// Creates a principal from role names as stored by the identity store.
    ///
    /// Names that do not match a portal role are dropped.
    #[must_use]
    pub fn from_role_names<'a>(
        role_names: impl IntoIterator<Item = &'a str>,
        claims: Vec<Claim>,
    ) -> Self {
        Self::new(
            role_names
                .into_iter()
                .filter_map(|name| name.parse::<Role>().ok()),
            claims,
        )
    }

    /// Returns whether the principal holds the role.
    #[must_use]
    pub fn is_in_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Returns the decoded roles in stable order.
    pub fn roles(&self) -> impl Iterator<Item = Role> + '_ {
        self.roles.iter().copied()
    }

    /// Returns all claims.
    #[must_use]
    pub fn claims(&self) -> &[Claim] {
        self.claims.as_slice()
    }

    /// Returns the value of the first claim with the given type.
    #[must_use]
    pub fn find_first_value(&self, claim_type: &str) -> Option<&str> {
        self.claims
            .iter()
            .find(|claim| claim.claim_type == claim_type)
            .map(Claim::value)
    }
}
