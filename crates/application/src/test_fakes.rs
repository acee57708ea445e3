use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use orgportal_core::{
    AppError, AppResult, Claim, NAME_IDENTIFIER_CLAIM, ORGANIZATION_ID_CLAIM, OrganizationId,
    Principal, Role,
};
use orgportal_domain::{
    Configuration, ConfigurationId, ConfigurationKey, ConfigurationSortColumn, Organization,
    OrganizationDraft, PortalUser, SortDirection, UserId, UserSortOrder,
};

use crate::portal_ports::{
    ConfigurationKeyRef, ConfigurationListItem, ConfigurationListQuery, ConfigurationRepository,
    ConfigurationUpdate, NewConfiguration, NewPortalUser, OrganizationRepository,
    OrganizationSelectionCache, PasswordHasher, PortalUserRepository, PortalUserUpdate,
    UserCredentials, UserListItem, UserListQuery, UserProfile,
};

pub(crate) fn organization(id: i64, name: &str) -> Organization {
    Organization {
        id: OrganizationId::new(id),
        display_name: name.to_owned(),
        client_id: format!("{name}-client"),
        client_secret: format!("{name}-secret"),
        show_users_all_files: false,
        created_at: Utc::now(),
        created_by: UserId::new(1),
        updated_at: None,
        updated_by: None,
    }
}

pub(crate) fn portal_user(id: i64, email: &str, organization_id: Option<i64>, roles: &[Role]) -> PortalUser {
    PortalUser {
        id: UserId::new(id),
        email: email.to_owned(),
        organization_id: organization_id.map(OrganizationId::new),
        is_active: true,
        roles: roles.to_vec(),
    }
}

pub(crate) fn super_user_principal(user_id: i64) -> Principal {
    Principal::new(
        [Role::SuperUser],
        vec![Claim::new(NAME_IDENTIFIER_CLAIM, user_id.to_string())],
    )
}

pub(crate) fn admin_principal(user_id: i64, organization_id: i64) -> Principal {
    Principal::new(
        [Role::Admin],
        vec![
            Claim::new(NAME_IDENTIFIER_CLAIM, user_id.to_string()),
            Claim::new(ORGANIZATION_ID_CLAIM, organization_id.to_string()),
        ],
    )
}

pub(crate) fn user_principal(user_id: i64, organization_id: i64) -> Principal {
    Principal::new(
        [Role::User],
        vec![
            Claim::new(NAME_IDENTIFIER_CLAIM, user_id.to_string()),
            Claim::new(ORGANIZATION_ID_CLAIM, organization_id.to_string()),
        ],
    )
}

#[derive(Default)]
pub(crate) struct FakeSelectionCache {
    pub(crate) entries: Mutex<HashMap<UserId, OrganizationId>>,
}

#[async_trait]
impl OrganizationSelectionCache for FakeSelectionCache {
    async fn selected_organization(&self, user_id: UserId) -> AppResult<Option<OrganizationId>> {
        Ok(self.entries.lock().await.get(&user_id).copied())
    }

    async fn select_organization(
        &self,
        user_id: UserId,
        organization_id: OrganizationId,
    ) -> AppResult<()> {
        self.entries.lock().await.insert(user_id, organization_id);
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        self.entries.lock().await.clear();
        Ok(())
    }
}

pub(crate) struct FailingSelectionCache;

#[async_trait]
impl OrganizationSelectionCache for FailingSelectionCache {
    async fn selected_organization(&self, _user_id: UserId) -> AppResult<Option<OrganizationId>> {
        Err(AppError::Internal("cache unavailable".to_owned()))
    }

    async fn select_organization(
        &self,
        _user_id: UserId,
        _organization_id: OrganizationId,
    ) -> AppResult<()> {
        Err(AppError::Internal("cache unavailable".to_owned()))
    }

    async fn clear(&self) -> AppResult<()> {
        Err(AppError::Internal("cache unavailable".to_owned()))
    }
}

#[derive(Default)]
pub(crate) struct FakeOrganizationRepository {
    pub(crate) organizations: Mutex<Vec<Organization>>,
}

impl FakeOrganizationRepository {
    pub(crate) fn with(organizations: Vec<Organization>) -> Self {
        Self {
            organizations: Mutex::new(organizations),
        }
    }
}

#[async_trait]
impl OrganizationRepository for FakeOrganizationRepository {
    async fn find_by_id(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Option<Organization>> {
        Ok(self
            .organizations
            .lock()
            .await
            .iter()
            .find(|organization| organization.id == organization_id)
            .cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<Organization>> {
        Ok(self.organizations.lock().await.clone())
    }

    async fn create(&self, draft: &OrganizationDraft, actor: UserId) -> AppResult<Organization> {
        let mut organizations = self.organizations.lock().await;
        let next_id = organizations
            .iter()
            .map(|organization| organization.id.as_i64())
            .max()
            .unwrap_or_default()
            + 1;
        let organization = Organization {
            id: OrganizationId::new(next_id),
            display_name: draft.display_name().to_owned(),
            client_id: draft.client_id().to_owned(),
            client_secret: draft.client_secret().to_owned(),
            show_users_all_files: false,
            created_at: Utc::now(),
            created_by: actor,
            updated_at: None,
            updated_by: None,
        };
        organizations.push(organization.clone());
        Ok(organization)
    }

    async fn update(
        &self,
        organization_id: OrganizationId,
        draft: &OrganizationDraft,
        actor: UserId,
    ) -> AppResult<Option<Organization>> {
        let mut organizations = self.organizations.lock().await;
        let Some(organization) = organizations
            .iter_mut()
            .find(|organization| organization.id == organization_id)
        else {
            return Ok(None);
        };

        organization.display_name = draft.display_name().to_owned();
        organization.client_id = draft.client_id().to_owned();
        organization.client_secret = draft.client_secret().to_owned();
        organization.updated_at = Some(Utc::now());
        organization.updated_by = Some(actor);
        Ok(Some(organization.clone()))
    }
}

pub(crate) struct FakeUserRepository {
    pub(crate) users: Mutex<Vec<(PortalUser, String)>>,
    pub(crate) organizations: Arc<FakeOrganizationRepository>,
    pub(crate) last_query: Mutex<Option<UserListQuery>>,
}

impl FakeUserRepository {
    pub(crate) fn new(organizations: Arc<FakeOrganizationRepository>) -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            organizations,
            last_query: Mutex::new(None),
        }
    }

    pub(crate) async fn insert(&self, user: PortalUser, password_hash: &str) {
        self.users.lock().await.push((user, password_hash.to_owned()));
    }

    async fn organization_name(&self, organization_id: Option<OrganizationId>) -> Option<String> {
        let organization_id = organization_id?;
        self.organizations
            .find_by_id(organization_id)
            .await
            .ok()
            .flatten()
            .map(|organization| organization.display_name)
    }
}

#[async_trait]
impl PortalUserRepository for FakeUserRepository {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserProfile>> {
        let user = self
            .users
            .lock()
            .await
            .iter()
            .find(|(user, _)| user.id == user_id)
            .map(|(user, _)| user.clone());
        let Some(user) = user else {
            return Ok(None);
        };

        let organization = match user.organization_id {
            Some(organization_id) => self.organizations.find_by_id(organization_id).await?,
            None => None,
        };

        Ok(Some(UserProfile { user, organization }))
    }

    async fn find_credentials_by_email(&self, email: &str) -> AppResult<Option<UserCredentials>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|(user, _)| user.email.eq_ignore_ascii_case(email))
            .map(|(user, password_hash)| UserCredentials {
                user: user.clone(),
                password_hash: password_hash.clone(),
            }))
    }

    async fn list_active(&self, query: &UserListQuery) -> AppResult<(Vec<UserListItem>, u64)> {
        *self.last_query.lock().await = Some(query.clone());

        let mut users = self
            .users
            .lock()
            .await
            .iter()
            .map(|(user, _)| user.clone())
            .filter(|user| user.is_active)
            .filter(|user| {
                query
                    .organization_id
                    .is_none_or(|organization_id| user.organization_id == Some(organization_id))
            })
            .filter(|user| {
                query.email_search.as_deref().is_none_or(|search| {
                    user.email.to_lowercase().contains(&search.to_lowercase())
                })
            })
            .collect::<Vec<_>>();

        match query.sort {
            UserSortOrder::Email => users.sort_by(|left, right| left.email.cmp(&right.email)),
            UserSortOrder::EmailDesc => users.sort_by(|left, right| right.email.cmp(&left.email)),
            UserSortOrder::Id => users.sort_by_key(|user| user.id),
            UserSortOrder::IdDesc => users.sort_by_key(|user| std::cmp::Reverse(user.id)),
        }

        let total = users.len() as u64;
        let mut items = Vec::new();
        for user in users
            .into_iter()
            .skip(query.page.offset() as usize)
            .take(query.page.page_size() as usize)
        {
            let organization_name = self.organization_name(user.organization_id).await;
            items.push(UserListItem {
                user,
                organization_name,
            });
        }

        Ok((items, total))
    }

    async fn create(&self, input: NewPortalUser) -> AppResult<PortalUser> {
        let mut users = self.users.lock().await;
        if users
            .iter()
            .any(|(user, _)| user.email.eq_ignore_ascii_case(input.email.as_str()))
        {
            return Err(AppError::Conflict(format!(
                "user '{}' already exists",
                input.email.as_str()
            )));
        }

        let next_id = users
            .iter()
            .map(|(user, _)| user.id.as_i64())
            .max()
            .unwrap_or_default()
            + 1;
        let user = PortalUser {
            id: UserId::new(next_id),
            email: input.email.as_str().to_owned(),
            organization_id: input.organization_id,
            is_active: true,
            roles: input.roles,
        };
        users.push((user.clone(), input.password_hash));
        Ok(user)
    }

    async fn update(
        &self,
        user_id: UserId,
        input: PortalUserUpdate,
    ) -> AppResult<Option<PortalUser>> {
        let mut users = self.users.lock().await;
        let Some((user, password_hash)) = users.iter_mut().find(|(user, _)| user.id == user_id)
        else {
            return Ok(None);
        };

        user.organization_id = input.organization_id;
        user.is_active = input.is_active;
        user.roles = input.roles;
        if let Some(new_hash) = input.password_hash {
            *password_hash = new_hash;
        }
        Ok(Some(user.clone()))
    }
}

#[derive(Default)]
pub(crate) struct FakeConfigurationRepository {
    pub(crate) configurations: Mutex<Vec<Configuration>>,
    pub(crate) keys: Mutex<Vec<ConfigurationKey>>,
    pub(crate) last_query: Mutex<Option<ConfigurationListQuery>>,
}

impl FakeConfigurationRepository {
    pub(crate) async fn insert(&self, id: ConfigurationId, organization_id: i64, key: &str, value: &str) {
        let key = ConfigurationKey {
            id,
            key: key.to_owned(),
            default_value: value.to_owned(),
            is_active: true,
            notes: None,
            is_encrypted: false,
        };
        self.keys.lock().await.push(key.clone());
        self.configurations.lock().await.push(Configuration {
            id,
            key,
            organization_id: OrganizationId::new(organization_id),
            value: value.to_owned(),
            is_active: true,
            notes: None,
            created_at: Utc::now(),
            created_by: UserId::new(1),
            updated_at: None,
            updated_by: None,
        });
    }
}

#[async_trait]
impl ConfigurationRepository for FakeConfigurationRepository {
    async fn list(
        &self,
        query: &ConfigurationListQuery,
    ) -> AppResult<(Vec<ConfigurationListItem>, u64)> {
        *self.last_query.lock().await = Some(query.clone());

        let mut rows = self
            .configurations
            .lock()
            .await
            .iter()
            .filter(|configuration| {
                query
                    .organization_id
                    .is_none_or(|organization_id| configuration.organization_id == organization_id)
            })
            .cloned()
            .collect::<Vec<_>>();

        if query.sort_column == ConfigurationSortColumn::Key {
            rows.sort_by(|left, right| left.key.key.cmp(&right.key.key));
        } else {
            rows.sort_by_key(|configuration| configuration.id);
        }
        if query.sort_direction == SortDirection::Desc {
            rows.reverse();
        }

        let total = rows.len() as u64;
        let items = rows
            .into_iter()
            .skip(query.page.offset() as usize)
            .take(query.page.page_size() as usize)
            .map(|configuration| ConfigurationListItem {
                organization_name: format!("org-{}", configuration.organization_id),
                created_by_name: None,
                configuration,
            })
            .collect();

        Ok((items, total))
    }

    async fn find_by_id(
        &self,
        configuration_id: ConfigurationId,
    ) -> AppResult<Option<Configuration>> {
        Ok(self
            .configurations
            .lock()
            .await
            .iter()
            .find(|configuration| configuration.id == configuration_id)
            .cloned())
    }

    async fn create(&self, input: NewConfiguration) -> AppResult<Configuration> {
        let mut keys = self.keys.lock().await;
        let key = match input.key {
            ConfigurationKeyRef::Existing(key_id) => keys
                .iter()
                .find(|key| key.id == key_id)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("configuration key '{key_id}' does not exist")))?,
            ConfigurationKeyRef::New => {
                let key = ConfigurationKey {
                    id: keys.iter().map(|key| key.id).max().unwrap_or_default() + 1,
                    key: input.draft.key().to_owned(),
                    default_value: input.draft.value().to_owned(),
                    is_active: true,
                    notes: input.draft.notes().map(ToOwned::to_owned),
                    is_encrypted: false,
                };
                keys.push(key.clone());
                key
            }
        };

        let mut configurations = self.configurations.lock().await;
        let configuration = Configuration {
            id: configurations
                .iter()
                .map(|configuration| configuration.id)
                .max()
                .unwrap_or_default()
                + 1,
            key,
            organization_id: input.organization_id,
            value: input.draft.value().to_owned(),
            is_active: true,
            notes: input.draft.notes().map(ToOwned::to_owned),
            created_at: Utc::now(),
            created_by: input.actor,
            updated_at: None,
            updated_by: None,
        };
        configurations.push(configuration.clone());
        Ok(configuration)
    }

    async fn update(
        &self,
        configuration_id: ConfigurationId,
        input: ConfigurationUpdate,
    ) -> AppResult<Option<Configuration>> {
        let mut configurations = self.configurations.lock().await;
        let Some(configuration) = configurations
            .iter_mut()
            .find(|configuration| configuration.id == configuration_id)
        else {
            return Ok(None);
        };

        configuration.value = input.draft.value().to_owned();
        configuration.notes = input.draft.notes().map(ToOwned::to_owned);
        configuration.key.key = input.draft.key().to_owned();
        configuration.updated_at = Some(Utc::now());
        configuration.updated_by = Some(input.actor);
        Ok(Some(configuration.clone()))
    }
}

#[derive(Default)]
pub(crate) struct FakePasswordHasher {
    pub(crate) hash_calls: AtomicUsize,
}

impl FakePasswordHasher {
    pub(crate) fn hash_calls(&self) -> usize {
        self.hash_calls.load(Ordering::SeqCst)
    }
}

impl PasswordHasher for FakePasswordHasher {
    fn hash_password(&self, password: &str) -> AppResult<String> {
        self.hash_calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("hashed:{password}"))
    }

    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        Ok(hash == format!("hashed:{password}"))
    }
}
