use async_trait::async_trait;
use chrono::{DateTime, Utc};
use orgportal_application::OrganizationRepository;
use orgportal_core::{AppError, AppResult, OrganizationId};
use orgportal_domain::{Organization, OrganizationDraft, UserId};
use sqlx::{FromRow, PgPool};

/// PostgreSQL-backed organization repository.
#[derive(Clone)]
pub struct PostgresOrganizationRepository {
    pool: PgPool,
}

impl PostgresOrganizationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct OrganizationRow {
    id: i64,
    display_name: String,
    client_id: String,
    client_secret: String,
    show_users_all_files: bool,
    created_at: DateTime<Utc>,
    created_by: i64,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<i64>,
}

impl From<OrganizationRow> for Organization {
    fn from(row: OrganizationRow) -> Self {
        Self {
            id: OrganizationId::new(row.id),
            display_name: row.display_name,
            client_id: row.client_id,
            client_secret: row.client_secret,
            show_users_all_files: row.show_users_all_files,
            created_at: row.created_at,
            created_by: UserId::new(row.created_by),
            updated_at: row.updated_at,
            updated_by: row.updated_by.map(UserId::new),
        }
    }
}

#[async_trait]
impl OrganizationRepository for PostgresOrganizationRepository {
    async fn find_by_id(
        &self,
        organization_id: OrganizationId,
    ) -> AppResult<Option<Organization>> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT id, display_name, client_id, client_secret, show_users_all_files,
                   created_at, created_by, updated_at, updated_by
            FROM organizations
            WHERE id = $1
            "#,
        )
        .bind(organization_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to find organization '{organization_id}': {error}"
            ))
        })?;

        Ok(row.map(Organization::from))
    }

    async fn list_all(&self) -> AppResult<Vec<Organization>> {
        let rows = sqlx::query_as::<_, OrganizationRow>(
            r#"
            SELECT id, display_name, client_id, client_secret, show_users_all_files,
                   created_at, created_by, updated_at, updated_by
            FROM organizations
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list organizations: {error}")))?;

        Ok(rows.into_iter().map(Organization::from).collect())
    }

    async fn create(&self, draft: &OrganizationDraft, actor: UserId) -> AppResult<Organization> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            INSERT INTO organizations (display_name, client_id, client_secret, created_by)
            VALUES ($1, $2, $3, $4)
            RETURNING id, display_name, client_id, client_secret, show_users_all_files,
                      created_at, created_by, updated_at, updated_by
            "#,
        )
        .bind(draft.display_name())
        .bind(draft.client_id())
        .bind(draft.client_secret())
        .bind(actor.as_i64())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create organization: {error}")))?;

        Ok(row.into())
    }

    async fn update(
        &self,
        organization_id: OrganizationId,
        draft: &OrganizationDraft,
        actor: UserId,
    ) -> AppResult<Option<Organization>> {
        let row = sqlx::query_as::<_, OrganizationRow>(
            r#"
            UPDATE organizations
            SET display_name = $2,
                client_id = $3,
                client_secret = $4,
                updated_at = now(),
                updated_by = $5
            WHERE id = $1
            RETURNING id, display_name, client_id, client_secret, show_users_all_files,
                      created_at, created_by, updated_at, updated_by
            "#,
        )
        .bind(organization_id.as_i64())
        .bind(draft.display_name())
        .bind(draft.client_id())
        .bind(draft.client_secret())
        .bind(actor.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update organization '{organization_id}': {error}"
            ))
        })?;

        Ok(row.map(Organization::from))
    }
}

#[cfg(test)]
mod tests;
