use async_trait::async_trait;
use orgportal_core::{AppResult, OrganizationId, Role};
use orgportal_domain::{EmailAddress, Organization, PageRequest, PortalUser, UserId, UserSortOrder};

/// User record with its linked organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    /// Stored user.
    pub user: PortalUser,
    /// Linked organization, if the user has one and it still exists.
    pub organization: Option<Organization>,
}

/// User record with its stored password hash, used only by login.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    /// Stored user.
    pub user: PortalUser,
    /// Argon2id PHC string.
    pub password_hash: String,
}

/// Filter, sort and page for the user listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserListQuery {
    /// Restricts rows to one organization. `None` lists every organization.
    pub organization_id: Option<OrganizationId>,
    /// Case-insensitive email substring.
    pub email_search: Option<String>,
    /// Sort order.
    pub sort: UserSortOrder,
    /// Requested page.
    pub page: PageRequest,
}

/// User row joined with display columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserListItem {
    /// Stored user.
    pub user: PortalUser,
    /// Display name of the linked organization.
    pub organization_name: Option<String>,
}

impl UserListItem {
    /// Returns the user's role names sorted and comma-joined.
    #[must_use]
    pub fn role_names(&self) -> String {
        let mut names = self
            .user
            .roles
            .iter()
            .map(|role| role.as_str())
            .collect::<Vec<_>>();
        names.sort_unstable();
        names.join(",")
    }
}

/// Input for inserting a portal user.
#[derive(Debug, Clone)]
pub struct NewPortalUser {
    /// Validated email, also the login name.
    pub email: EmailAddress,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Linked organization.
    pub organization_id: Option<OrganizationId>,
    /// Roles granted on creation.
    pub roles: Vec<Role>,
}

/// Input for updating a portal user.
#[derive(Debug, Clone)]
pub struct PortalUserUpdate {
    /// Linked organization.
    pub organization_id: Option<OrganizationId>,
    /// Whether the account may sign in.
    pub is_active: bool,
    /// Replacement role set.
    pub roles: Vec<Role>,
    /// New password hash, when the password is being reset.
    pub password_hash: Option<String>,
}

/// Repository port for portal users and their role memberships.
#[async_trait]
pub trait PortalUserRepository: Send + Sync {
    /// Finds a user with their linked organization.
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserProfile>>;

    /// Finds login credentials by email (case-insensitive).
    async fn find_credentials_by_email(&self, email: &str) -> AppResult<Option<UserCredentials>>;

    /// Lists one page of active users and the total row count.
    async fn list_active(&self, query: &UserListQuery) -> AppResult<(Vec<UserListItem>, u64)>;

    /// Inserts a user. Fails with `Conflict` when the email is taken.
    async fn create(&self, input: NewPortalUser) -> AppResult<PortalUser>;

    /// Updates a user and replaces their roles. Returns `None` when the id is
    /// unknown.
    async fn update(&self, user_id: UserId, input: PortalUserUpdate)
    -> AppResult<Option<PortalUser>>;
}

/// Port for password hashing operations. Keeps domain/application free of
/// direct cryptographic library coupling.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password using Argon2id.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}
