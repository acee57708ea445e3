//! Sign-in and sign-out for portal users.
//!
//! Login answers every failure the same way so that callers cannot probe
//! which emails are registered.

use std::sync::Arc;

use orgportal_core::{
    AppResult, Claim, NAME_CLAIM, NAME_IDENTIFIER_CLAIM, ORGANIZATION_ID_CLAIM, Principal, Role,
};
use orgportal_domain::access::logged_in_user_id;
use orgportal_domain::{PortalUser, UserId};
use tracing::{info, warn};

use crate::OrganizationSelectionService;
use crate::portal_ports::{PasswordHasher, PortalUserRepository};

/// Result of a login attempt.
#[derive(Debug)]
pub enum AuthOutcome {
    /// Authentication succeeded. Session can be established.
    Authenticated(Principal),
    /// Authentication failed. Generic message prevents enumeration.
    Failed,
}

/// Application service for portal authentication.
#[derive(Clone)]
pub struct AuthService {
    user_repository: Arc<dyn PortalUserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    selection_service: OrganizationSelectionService,
}

impl AuthService {
    /// Creates a new auth service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn PortalUserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        selection_service: OrganizationSelectionService,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            selection_service,
        }
    }

    /// Authenticates a user with email and password.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthOutcome> {
        let credentials = self
            .user_repository
            .find_credentials_by_email(email.trim())
            .await?;

        let Some(credentials) = credentials else {
            // Always hash to keep timing uniform when the user is unknown.
            let _ = self.password_hasher.hash_password(password);
            return Ok(AuthOutcome::Failed);
        };

        if !credentials.user.is_active {
            let _ = self.password_hasher.hash_password(password);
            warn!(user_id = %credentials.user.id, "login rejected for inactive user");
            return Ok(AuthOutcome::Failed);
        }

        if !self
            .password_hasher
            .verify_password(password, &credentials.password_hash)?
        {
            warn!(user_id = %credentials.user.id, "login rejected for invalid password");
            return Ok(AuthOutcome::Failed);
        }

        info!(user_id = %credentials.user.id, "user signed in");
        Ok(AuthOutcome::Authenticated(principal_for(&credentials.user)))
    }

    /// Signs the principal out and resets the organization-selection cache.
    ///
    /// Fails with `InvalidArgument` when there is no principal.
    pub async fn logout(&self, principal: Option<&Principal>) -> AppResult<UserId> {
        let user_id = logged_in_user_id::<UserId>(principal)?;
        self.selection_service.clear_cache(user_id).await?;
        info!(%user_id, "user signed out");
        Ok(user_id)
    }
}

/// Builds the claims principal stored in the session for a user.
///
/// SuperUsers never carry an `OrganizationId` claim.
#[must_use]
pub fn principal_for(user: &PortalUser) -> Principal {
    let mut claims = vec![
        Claim::new(NAME_IDENTIFIER_CLAIM, user.id.to_string()),
        Claim::new(NAME_CLAIM, user.email.clone()),
    ];

    if let Some(organization_id) = user.organization_id
        && !user.has_role(Role::SuperUser)
    {
        claims.push(Claim::new(ORGANIZATION_ID_CLAIM, organization_id.to_string()));
    }

    Principal::new(user.roles.iter().copied(), claims)
}
