use async_trait::async_trait;
use chrono::{DateTime, Utc};
use orgportal_application::{
    ConfigurationKeyRef, ConfigurationListItem, ConfigurationListQuery, ConfigurationRepository,
    ConfigurationUpdate, NewConfiguration,
};
use orgportal_core::{AppError, AppResult, OrganizationId};
use orgportal_domain::{
    Configuration, ConfigurationId, ConfigurationKey, ConfigurationSortColumn, UserId,
};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

/// PostgreSQL-backed configuration repository.
#[derive(Clone)]
pub struct PostgresConfigurationRepository {
    pool: PgPool,
}

impl PostgresConfigurationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const CONFIGURATION_SELECT: &str = r#"
    SELECT c.id, c.organization_id, c.value, c.is_active, c.notes,
           c.created_at, c.created_by, c.updated_at, c.updated_by,
           k.id AS key_id, k.key AS key_name, k.default_value,
           k.is_active AS key_is_active, k.notes AS key_notes, k.is_encrypted
    FROM configurations c
    JOIN configuration_keys k ON k.id = c.configuration_key_id
"#;

#[derive(Debug, FromRow)]
struct ConfigurationRow {
    id: i64,
    organization_id: i64,
    value: String,
    is_active: bool,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    created_by: i64,
    updated_at: Option<DateTime<Utc>>,
    updated_by: Option<i64>,
    key_id: i64,
    key_name: String,
    default_value: String,
    key_is_active: bool,
    key_notes: Option<String>,
    is_encrypted: bool,
}

impl From<ConfigurationRow> for Configuration {
    fn from(row: ConfigurationRow) -> Self {
        Self {
            id: row.id,
            key: ConfigurationKey {
                id: row.key_id,
                key: row.key_name,
                default_value: row.default_value,
                is_active: row.key_is_active,
                notes: row.key_notes,
                is_encrypted: row.is_encrypted,
            },
            organization_id: OrganizationId::new(row.organization_id),
            value: row.value,
            is_active: row.is_active,
            notes: row.notes,
            created_at: row.created_at,
            created_by: UserId::new(row.created_by),
            updated_at: row.updated_at,
            updated_by: row.updated_by.map(UserId::new),
        }
    }
}

#[derive(Debug, FromRow)]
struct ConfigurationListRow {
    #[sqlx(flatten)]
    configuration: ConfigurationRow,
    organization_name: String,
    created_by_name: Option<String>,
}

fn sort_column_sql(column: ConfigurationSortColumn) -> &'static str {
    match column {
        ConfigurationSortColumn::Id => "c.id",
        ConfigurationSortColumn::Key => "k.key",
        ConfigurationSortColumn::Value => "c.value",
        ConfigurationSortColumn::OrganizationName => "o.display_name",
        ConfigurationSortColumn::CreateDate => "c.created_at",
        ConfigurationSortColumn::Notes => "c.notes",
    }
}

fn push_organization_filter(
    builder: &mut QueryBuilder<'_, Postgres>,
    query: &ConfigurationListQuery,
) {
    if let Some(organization_id) = query.organization_id {
        builder.push(" WHERE c.organization_id = ");
        builder.push_bind(organization_id.as_i64());
    }
}

impl PostgresConfigurationRepository {
    async fn find_row(&self, configuration_id: ConfigurationId) -> AppResult<Option<Configuration>> {
        let row = sqlx::query_as::<_, ConfigurationRow>(&format!(
            "{CONFIGURATION_SELECT} WHERE c.id = $1"
        ))
        .bind(configuration_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to find configuration '{configuration_id}': {error}"
            ))
        })?;

        Ok(row.map(Configuration::from))
    }
}

#[async_trait]
impl ConfigurationRepository for PostgresConfigurationRepository {
    async fn list(
        &self,
        query: &ConfigurationListQuery,
    ) -> AppResult<(Vec<ConfigurationListItem>, u64)> {
        let mut count_builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM configurations c");
        push_organization_filter(&mut count_builder, query);
        let total_count = count_builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to count configurations: {error}"))
            })?;

        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            r#"
            SELECT c.id, c.organization_id, c.value, c.is_active, c.notes,
                   c.created_at, c.created_by, c.updated_at, c.updated_by,
                   k.id AS key_id, k.key AS key_name, k.default_value,
                   k.is_active AS key_is_active, k.notes AS key_notes, k.is_encrypted,
                   o.display_name AS organization_name,
                   u.email AS created_by_name
            FROM configurations c
            JOIN configuration_keys k ON k.id = c.configuration_key_id
            JOIN organizations o ON o.id = c.organization_id
            LEFT JOIN portal_users u ON u.id = c.created_by
            "#
        ));
        push_organization_filter(&mut builder, query);

        let direction = query.sort_direction.as_sql();
        builder.push(format!(
            " ORDER BY {} {direction}, c.id {direction}",
            sort_column_sql(query.sort_column)
        ));
        builder.push(" LIMIT ");
        builder.push_bind(i64::from(query.page.page_size()));
        builder.push(" OFFSET ");
        builder.push_bind(i64::try_from(query.page.offset()).unwrap_or(i64::MAX));

        let rows = builder
            .build_query_as::<ConfigurationListRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to list configurations: {error}"))
            })?;

        let items = rows
            .into_iter()
            .map(|row| ConfigurationListItem {
                configuration: row.configuration.into(),
                organization_name: row.organization_name,
                created_by_name: row.created_by_name,
            })
            .collect();

        Ok((items, u64::try_from(total_count).unwrap_or_default()))
    }

    async fn find_by_id(
        &self,
        configuration_id: ConfigurationId,
    ) -> AppResult<Option<Configuration>> {
        self.find_row(configuration_id).await
    }

    async fn create(&self, input: NewConfiguration) -> AppResult<Configuration> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        let key_id = match input.key {
            ConfigurationKeyRef::Existing(key_id) => key_id,
            ConfigurationKeyRef::New => sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO configuration_keys (
                    key, default_value, notes, is_active, is_encrypted, created_by
                )
                VALUES ($1, $2, $3, TRUE, FALSE, $4)
                RETURNING id
                "#,
            )
            .bind(input.draft.key())
            .bind(input.draft.value())
            .bind(input.draft.notes())
            .bind(input.actor.as_i64())
            .fetch_one(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to create configuration key: {error}"))
            })?,
        };

        let configuration_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO configurations (
                configuration_key_id, organization_id, value, notes, created_by
            )
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(key_id)
        .bind(input.organization_id.as_i64())
        .bind(input.draft.value())
        .bind(input.draft.notes())
        .bind(input.actor.as_i64())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| match error {
            sqlx::Error::Database(database_error) if database_error.is_foreign_key_violation() => {
                AppError::NotFound(format!(
                    "configuration key '{key_id}' or organization '{}' does not exist",
                    input.organization_id
                ))
            }
            error => AppError::Internal(format!("failed to create configuration: {error}")),
        })?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        self.find_row(configuration_id).await?.ok_or_else(|| {
            AppError::Internal(format!(
                "configuration '{configuration_id}' vanished after insert"
            ))
        })
    }

    async fn update(
        &self,
        configuration_id: ConfigurationId,
        input: ConfigurationUpdate,
    ) -> AppResult<Option<Configuration>> {
        let mut transaction =
            self.pool.begin().await.map_err(|error| {
                AppError::Internal(format!("failed to begin transaction: {error}"))
            })?;

        let key_id = sqlx::query_scalar::<_, i64>(
            r#"
            UPDATE configurations
            SET value = $2,
                notes = $3,
                updated_at = now(),
                updated_by = $4
            WHERE id = $1
            RETURNING configuration_key_id
            "#,
        )
        .bind(configuration_id)
        .bind(input.draft.value())
        .bind(input.draft.notes())
        .bind(input.actor.as_i64())
        .fetch_optional(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update configuration '{configuration_id}': {error}"
            ))
        })?;

        let Some(key_id) = key_id else {
            return Ok(None);
        };

        sqlx::query(
            r#"
            UPDATE configuration_keys
            SET key = $2,
                updated_at = now(),
                updated_by = $3
            WHERE id = $1
            "#,
        )
        .bind(key_id)
        .bind(input.draft.key())
        .bind(input.actor.as_i64())
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to rename configuration key '{key_id}': {error}"
            ))
        })?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        self.find_row(configuration_id).await
    }
}
