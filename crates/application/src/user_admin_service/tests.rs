use std::sync::Arc;

use orgportal_core::{AppError, OrganizationId, Role};
use orgportal_domain::{UserId, UserSortOrder};

use crate::test_fakes::{
    FakeOrganizationRepository, FakePasswordHasher, FakeUserRepository, admin_principal,
    organization, portal_user, super_user_principal, user_principal,
};

use super::{CreateUserInput, PasswordReset, UpdateUserInput, UserAdminService, UserListRequest};

struct Harness {
    service: UserAdminService,
    users: Arc<FakeUserRepository>,
}

async fn harness() -> Harness {
    let organizations = Arc::new(FakeOrganizationRepository::with(vec![
        organization(1, "acme"),
        organization(2, "globex"),
    ]));
    let users = Arc::new(FakeUserRepository::new(organizations));
    users
        .insert(portal_user(10, "root@example.com", None, &[Role::SuperUser]), "")
        .await;
    users
        .insert(portal_user(20, "admin@acme.com", Some(1), &[Role::Admin]), "")
        .await;
    users
        .insert(portal_user(21, "bob@acme.com", Some(1), &[Role::User]), "")
        .await;
    users
        .insert(portal_user(30, "carol@globex.com", Some(2), &[Role::User]), "")
        .await;

    let mut inactive = portal_user(31, "gone@acme.com", Some(1), &[Role::User]);
    inactive.is_active = false;
    users.insert(inactive, "").await;

    Harness {
        service: UserAdminService::new(
            users.clone(),
            Arc::new(FakePasswordHasher::default()),
            10,
        ),
        users,
    }
}

fn password(value: &str) -> PasswordReset {
    PasswordReset {
        password: value.to_owned(),
        confirmation: value.to_owned(),
    }
}

#[tokio::test]
async fn admin_listing_is_restricted_to_own_organization() {
    let harness = harness().await;

    let page = harness
        .service
        .list_users(&admin_principal(20, 1), UserListRequest::default())
        .await
        .unwrap_or_else(|_| panic!("listing should succeed"));

    let emails = page
        .items()
        .iter()
        .map(|item| item.user.email.as_str())
        .collect::<Vec<_>>();
    assert_eq!(emails, vec!["admin@acme.com", "bob@acme.com"]);
}

#[tokio::test]
async fn super_user_listing_searches_and_sorts_active_users() {
    let harness = harness().await;

    let page = harness
        .service
        .list_users(
            &super_user_principal(10),
            UserListRequest {
                page_index: 1,
                email_search: Some("  ACME ".to_owned()),
                sort: UserSortOrder::IdDesc,
            },
        )
        .await
        .unwrap_or_else(|_| panic!("listing should succeed"));

    let ids = page
        .items()
        .iter()
        .map(|item| item.user.id)
        .collect::<Vec<_>>();
    assert_eq!(ids, vec![UserId::new(21), UserId::new(20)]);

    let query = harness.users.last_query.lock().await.clone();
    assert_eq!(
        query.and_then(|query| query.email_search),
        Some("ACME".to_owned())
    );
}

#[tokio::test]
async fn admin_cannot_open_other_organizations_user() {
    let harness = harness().await;

    let own = harness
        .service
        .get_user(&admin_principal(20, 1), UserId::new(21))
        .await;
    assert!(own.is_ok());

    let foreign = harness
        .service
        .get_user(&admin_principal(20, 1), UserId::new(30))
        .await;
    assert!(matches!(foreign, Err(AppError::Forbidden(_))));

    let missing = harness
        .service
        .get_user(&super_user_principal(10), UserId::new(99))
        .await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn admin_update_forces_own_organization() {
    let harness = harness().await;

    let updated = harness
        .service
        .update_user(
            &admin_principal(20, 1),
            UserId::new(21),
            UpdateUserInput {
                organization_id: Some(OrganizationId::new(2)),
                is_active: true,
                roles: vec![Role::Admin, Role::User, Role::Admin],
                password_reset: None,
            },
        )
        .await
        .unwrap_or_else(|_| panic!("update should succeed"));

    assert_eq!(updated.organization_id, Some(OrganizationId::new(1)));
    assert_eq!(updated.roles, vec![Role::User, Role::Admin]);
}

#[tokio::test]
async fn admin_cannot_grant_super_user() {
    let harness = harness().await;

    let updated = harness
        .service
        .update_user(
            &admin_principal(20, 1),
            UserId::new(21),
            UpdateUserInput {
                organization_id: None,
                is_active: true,
                roles: vec![Role::SuperUser],
                password_reset: None,
            },
        )
        .await;
    assert!(matches!(updated, Err(AppError::Forbidden(_))));

    let created = harness
        .service
        .create_user(
            &admin_principal(20, 1),
            CreateUserInput {
                email: "new@acme.com".to_owned(),
                password: password("secret1"),
                organization_id: OrganizationId::new(1),
                roles: vec![Role::SuperUser],
                create_super_user: false,
            },
        )
        .await;
    assert!(matches!(created, Err(AppError::Forbidden(_))));

    let super_user = harness
        .service
        .create_user(
            &admin_principal(20, 1),
            CreateUserInput {
                email: "new@acme.com".to_owned(),
                password: password("secret1"),
                organization_id: OrganizationId::UNSCOPED,
                roles: Vec::new(),
                create_super_user: true,
            },
        )
        .await;
    assert!(matches!(super_user, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn password_reset_is_validated_and_hashed() {
    let harness = harness().await;

    let mismatch = harness
        .service
        .update_user(
            &super_user_principal(10),
            UserId::new(30),
            UpdateUserInput {
                organization_id: Some(OrganizationId::new(2)),
                is_active: true,
                roles: vec![Role::User],
                password_reset: Some(PasswordReset {
                    password: "secret1".to_owned(),
                    confirmation: "secret2".to_owned(),
                }),
            },
        )
        .await;
    assert!(matches!(mismatch, Err(AppError::Validation(_))));

    harness
        .service
        .update_user(
            &super_user_principal(10),
            UserId::new(30),
            UpdateUserInput {
                organization_id: Some(OrganizationId::new(1)),
                is_active: false,
                roles: vec![Role::User],
                password_reset: Some(password("secret1")),
            },
        )
        .await
        .unwrap_or_else(|_| panic!("update should succeed"));

    let users = harness.users.users.lock().await;
    let stored = users.iter().find(|(user, _)| user.id == UserId::new(30));
    assert_eq!(
        stored.map(|(user, hash)| (user.organization_id, user.is_active, hash.as_str())),
        Some((Some(OrganizationId::new(1)), false, "hashed:secret1"))
    );
}

#[tokio::test]
async fn super_user_creates_super_user_without_organization() {
    let harness = harness().await;

    let created = harness
        .service
        .create_user(
            &super_user_principal(10),
            CreateUserInput {
                email: "Root2@Example.com".to_owned(),
                password: password("secret1"),
                organization_id: OrganizationId::new(2),
                roles: vec![Role::Admin],
                create_super_user: true,
            },
        )
        .await
        .unwrap_or_else(|_| panic!("create should succeed"));

    assert_eq!(created.email, "root2@example.com");
    assert_eq!(created.organization_id, None);
    assert_eq!(created.roles, vec![Role::SuperUser]);
}

#[tokio::test]
async fn create_requires_organization_and_unique_email() {
    let harness = harness().await;

    let no_organization = harness
        .service
        .create_user(
            &super_user_principal(10),
            CreateUserInput {
                email: "new@acme.com".to_owned(),
                password: password("secret1"),
                organization_id: OrganizationId::UNSCOPED,
                roles: vec![Role::User],
                create_super_user: false,
            },
        )
        .await;
    assert!(matches!(no_organization, Err(AppError::Validation(_))));

    let duplicate = harness
        .service
        .create_user(
            &admin_principal(20, 1),
            CreateUserInput {
                email: "bob@acme.com".to_owned(),
                password: password("secret1"),
                organization_id: OrganizationId::new(2),
                roles: vec![Role::User],
                create_super_user: false,
            },
        )
        .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let short_password = harness
        .service
        .create_user(
            &admin_principal(20, 1),
            CreateUserInput {
                email: "dave@acme.com".to_owned(),
                password: password("12345"),
                organization_id: OrganizationId::new(1),
                roles: vec![Role::User],
                create_super_user: false,
            },
        )
        .await;
    assert!(matches!(short_password, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn assignable_roles_depend_on_actor() {
    let harness = harness().await;

    assert_eq!(
        harness
            .service
            .assignable_roles(&super_user_principal(10))
            .unwrap_or_default()
            .len(),
        3
    );
    assert!(
        !harness
            .service
            .assignable_roles(&admin_principal(20, 1))
            .unwrap_or_default()
            .contains(&Role::SuperUser)
    );
    assert!(matches!(
        harness.service.assignable_roles(&user_principal(21, 1)),
        Err(AppError::Forbidden(_))
    ));
}
