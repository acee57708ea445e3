//! PostgreSQL-backed portal user repository.

use async_trait::async_trait;
use orgportal_application::{
    NewPortalUser, OrganizationRepository, PortalUserRepository, PortalUserUpdate,
    UserCredentials, UserListItem, UserListQuery, UserProfile,
};
use orgportal_core::{AppError, AppResult, OrganizationId, Role};
use orgportal_domain::{PortalUser, UserId, UserSortOrder};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder, Transaction};

use crate::PostgresOrganizationRepository;

/// PostgreSQL implementation of the portal user repository port.
#[derive(Clone)]
pub struct PostgresPortalUserRepository {
    pool: PgPool,
    organization_repository: PostgresOrganizationRepository,
}

impl PostgresPortalUserRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            organization_repository: PostgresOrganizationRepository::new(pool.clone()),
            pool,
        }
    }
}

const USER_COLUMNS: &str = r#"
    u.id,
    u.email,
    u.organization_id,
    u.is_active,
    COALESCE(
        array_agg(r.role_name ORDER BY r.role_name) FILTER (WHERE r.role_name IS NOT NULL),
        '{}'::text[]
    ) AS roles
"#;

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    email: String,
    organization_id: Option<i64>,
    is_active: bool,
    roles: Vec<String>,
}

impl From<UserRow> for PortalUser {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            email: row.email,
            organization_id: row.organization_id.map(OrganizationId::new),
            is_active: row.is_active,
            roles: decode_roles(row.roles),
        }
    }
}

#[derive(Debug, FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

#[derive(Debug, FromRow)]
struct UserListRow {
    #[sqlx(flatten)]
    user: UserRow,
    organization_name: Option<String>,
}

#[derive(Debug, FromRow)]
struct UpdatedUserRow {
    id: i64,
    email: String,
    organization_id: Option<i64>,
    is_active: bool,
}

fn decode_roles(names: Vec<String>) -> Vec<Role> {
    let mut roles = names
        .iter()
        .filter_map(|name| name.parse::<Role>().ok())
        .collect::<Vec<_>>();
    roles.sort_unstable();
    roles.dedup();
    roles
}

fn push_list_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &UserListQuery) {
    builder.push(" WHERE u.is_active");

    if let Some(organization_id) = query.organization_id {
        builder.push(" AND u.organization_id = ");
        builder.push_bind(organization_id.as_i64());
    }

    if let Some(search) = query.email_search.as_deref() {
        builder.push(r" AND u.email ILIKE ");
        builder.push_bind(format!("%{}%", escape_like(search)));
        builder.push(r" ESCAPE '\'");
    }
}

fn escape_like(value: &str) -> String {
    value
        .replace('\\', r"\\")
        .replace('%', r"\%")
        .replace('_', r"\_")
}

fn order_by_clause(sort: UserSortOrder) -> &'static str {
    match sort {
        UserSortOrder::Email => " ORDER BY u.email ASC, u.id ASC",
        UserSortOrder::EmailDesc => " ORDER BY u.email DESC, u.id DESC",
        UserSortOrder::Id => " ORDER BY u.id ASC",
        UserSortOrder::IdDesc => " ORDER BY u.id DESC",
    }
}

async fn replace_roles(
    transaction: &mut Transaction<'_, Postgres>,
    user_id: i64,
    roles: &[Role],
) -> AppResult<()> {
    sqlx::query("DELETE FROM portal_user_roles WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut **transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to clear roles of user '{user_id}': {error}"))
        })?;

    for role in roles {
        sqlx::query(
            r#"
            INSERT INTO portal_user_roles (user_id, role_name)
            VALUES ($1, $2)
            ON CONFLICT (user_id, role_name) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(role.as_str())
        .execute(&mut **transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to assign role '{role}' to user '{user_id}': {error}"
            ))
        })?;
    }

    Ok(())
}

#[async_trait]
impl PortalUserRepository for PostgresPortalUserRepository {
    async fn find_by_id(&self, user_id: UserId) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM portal_users u
            LEFT JOIN portal_user_roles r ON r.user_id = u.id
            WHERE u.id = $1
            GROUP BY u.id
            "#
        ))
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user '{user_id}': {error}")))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user = PortalUser::from(row);
        let organization = match user.organization_id {
            Some(organization_id) => {
                self.organization_repository
                    .find_by_id(organization_id)
                    .await?
            }
            None => None,
        };

        Ok(Some(UserProfile { user, organization }))
    }

    async fn find_credentials_by_email(&self, email: &str) -> AppResult<Option<UserCredentials>> {
        let row = sqlx::query_as::<_, CredentialsRow>(&format!(
            r#"
            SELECT {USER_COLUMNS}, u.password_hash
            FROM portal_users u
            LEFT JOIN portal_user_roles r ON r.user_id = u.id
            WHERE lower(u.email) = lower($1)
            GROUP BY u.id
            "#
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to find user by email: {error}")))?;

        Ok(row.map(|row| UserCredentials {
            user: row.user.into(),
            password_hash: row.password_hash,
        }))
    }

    async fn list_active(&self, query: &UserListQuery) -> AppResult<(Vec<UserListItem>, u64)> {
        let mut count_builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM portal_users u");
        push_list_filters(&mut count_builder, query);
        let total_count = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to count users: {error}")))?;

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            r#"
            SELECT {USER_COLUMNS}, o.display_name AS organization_name
            FROM portal_users u
            LEFT JOIN organizations o ON o.id = u.organization_id
            LEFT JOIN portal_user_roles r ON r.user_id = u.id
            "#
        ));
        push_list_filters(&mut builder, query);
        builder.push(" GROUP BY u.id, o.display_name");
        builder.push(order_by_clause(query.sort));
        builder.push(" LIMIT ");
        builder.push_bind(i64::from(query.page.page_size()));
        builder.push(" OFFSET ");
        builder.push_bind(i64::try_from(query.page.offset()).unwrap_or(i64::MAX));

        let rows = builder
            .build_query_as::<UserListRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to list users: {error}")))?;

        let items = rows
            .into_iter()
            .map(|row| UserListItem {
                user: row.user.into(),
                organization_name: row.organization_name,
            })
            .collect();

        Ok((items, u64::try_from(total_count).unwrap_or_default()))
    }

    async fn create(&self, input: NewPortalUser) -> AppResult<PortalUser> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        let user_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO portal_users (email, organization_id, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(input.email.as_str())
        .bind(input.organization_id.map(|organization_id| organization_id.as_i64()))
        .bind(input.password_hash.as_str())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| match error {
            sqlx::Error::Database(database_error) if database_error.is_unique_violation() => {
                AppError::Conflict(format!("user '{}' already exists", input.email.as_str()))
            }
            error => AppError::Internal(format!("failed to create user: {error}")),
        })?;

        let mut roles = input.roles;
        roles.sort_unstable();
        roles.dedup();
        replace_roles(&mut transaction, user_id, &roles).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(PortalUser {
            id: UserId::new(user_id),
            email: input.email.into(),
            organization_id: input.organization_id,
            is_active: true,
            roles,
        })
    }

    async fn update(
        &self,
        user_id: UserId,
        input: PortalUserUpdate,
    ) -> AppResult<Option<PortalUser>> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        let row = sqlx::query_as::<_, UpdatedUserRow>(
            r#"
            UPDATE portal_users
            SET organization_id = $2,
                is_active = $3,
                password_hash = COALESCE($4, password_hash)
            WHERE id = $1
            RETURNING id, email, organization_id, is_active
            "#,
        )
        .bind(user_id.as_i64())
        .bind(input.organization_id.map(|organization_id| organization_id.as_i64()))
        .bind(input.is_active)
        .bind(input.password_hash.as_deref())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to update user '{user_id}': {error}"))
        })?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut roles = input.roles;
        roles.sort_unstable();
        roles.dedup();
        replace_roles(&mut transaction, row.id, &roles).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(Some(PortalUser {
            id: UserId::new(row.id),
            email: row.email,
            organization_id: row.organization_id.map(OrganizationId::new),
            is_active: row.is_active,
            roles,
        }))
    }
}
