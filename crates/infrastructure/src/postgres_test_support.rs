use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Connects to `DATABASE_URL` and applies migrations, or returns `None` so
/// the calling test can skip.
pub(crate) async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres portal tests: {error}");
    }

    Some(pool)
}

/// Returns a suffix that keeps rows from parallel test runs apart.
pub(crate) fn unique_suffix() -> String {
    chrono::Utc::now()
        .timestamp_nanos_opt()
        .unwrap_or_default()
        .to_string()
}

pub(crate) async fn insert_user(
    pool: &PgPool,
    email: &str,
    organization_id: Option<i64>,
    roles: &[&str],
) -> i64 {
    let user_id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO portal_users (email, organization_id, password_hash)
        VALUES ($1, $2, 'hash')
        RETURNING id
        "#,
    )
    .bind(email)
    .bind(organization_id)
    .fetch_one(pool)
    .await
    .unwrap_or_else(|error| panic!("failed to insert test user: {error}"));

    for role in roles {
        let insert = sqlx::query("INSERT INTO portal_user_roles (user_id, role_name) VALUES ($1, $2)")
            .bind(user_id)
            .bind(*role)
            .execute(pool)
            .await;
        assert!(insert.is_ok());
    }

    user_id
}
