use orgportal_application::OrganizationRepository;
use orgportal_core::{AppResult, OrganizationId};
use orgportal_domain::{OrganizationDraft, UserId};

use crate::postgres_test_support::{test_pool, unique_suffix};

use super::PostgresOrganizationRepository;

#[tokio::test]
async fn create_update_and_find_round_trip_audit_columns() -> AppResult<()> {
    let Some(pool) = test_pool().await else {
        return Ok(());
    };

    let repository = PostgresOrganizationRepository::new(pool);
    let name = format!("Acme {}", unique_suffix());

    let created = repository
        .create(
            &OrganizationDraft::new(name.as_str(), "client", "secret")?,
            UserId::new(3),
        )
        .await?;
    assert_eq!(created.display_name, name);
    assert_eq!(created.created_by, UserId::new(3));
    assert!(created.updated_at.is_none());

    let updated = repository
        .update(
            created.id,
            &OrganizationDraft::new("Renamed", "client-2", "secret-2")?,
            UserId::new(4),
        )
        .await?;
    assert_eq!(
        updated.map(|organization| (organization.client_id, organization.updated_by)),
        Some(("client-2".to_owned(), Some(UserId::new(4))))
    );

    let listed = repository.list_all().await?;
    assert!(listed.iter().any(|organization| organization.id == created.id));
    Ok(())
}

#[tokio::test]
async fn unknown_ids_resolve_to_none() -> AppResult<()> {
    let Some(pool) = test_pool().await else {
        return Ok(());
    };

    let repository = PostgresOrganizationRepository::new(pool);
    let missing = OrganizationId::new(i64::MAX);

    assert!(repository.find_by_id(missing).await?.is_none());
    assert!(
        repository
            .update(
                missing,
                &OrganizationDraft::new("x", "y", "z")?,
                UserId::new(1),
            )
            .await?
            .is_none()
    );
    Ok(())
}
