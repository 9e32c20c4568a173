/// Integration tests for permission evaluation against the SQLite store
mod helpers;
use helpers::*;
use ikeeper::application::services::PermissionService;
use ikeeper::bootstrap;
use ikeeper::domain::errors::DomainError;
use ikeeper::domain::permissions::{Action, SystemRole};
use ikeeper::domain::ports::permission_store::PermissionStore;
use ikeeper::domain::ports::role_repository::RoleRepository;
use ikeeper::infrastructure::persistence::Database;
use std::sync::Arc;

fn permission_service(db: &Database) -> PermissionService {
    PermissionService::new(Arc::new(db.clone()))
}

#[tokio::test]
async fn test_member_scenario() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let svc = permission_service(db);

    let role = create_test_role(db, "writer", &[Action::CreatePost, Action::ViewPosts]).await;
    let user = create_test_user(db, "writer1", role).await;

    assert!(svc
        .has_all_permissions(user, &[Action::CreatePost, Action::ViewPosts])
        .await
        .unwrap());
    assert!(!svc.has_permission(user, Action::DeleteAnyPost).await.unwrap());
    assert!(svc
        .has_any_permission(user, &[Action::DeleteAnyPost, Action::ViewPosts])
        .await
        .unwrap());

    let granted = svc.get_user_permissions(user).await.unwrap();
    assert_eq!(
        granted.into_iter().collect::<Vec<_>>(),
        vec!["create_post".to_string(), "view_posts".to_string()]
    );
}

#[tokio::test]
async fn test_grant_replacement_drops_old_grants() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let svc = permission_service(db);

    let role = create_test_role(db, "librarian", &[Action::BorrowBook, Action::ReturnBook]).await;
    let first = create_test_user(db, "lib1", role).await;
    let second = create_test_user(db, "lib2", role).await;
    assert!(svc.has_permission(first, Action::BorrowBook).await.unwrap());

    // Delete every grant, then re-grant view_books only.
    let view_books = permission_ids(db, &[Action::ViewBooks]).await;
    db.update_role(role, None, None, Some(&[][..])).await.unwrap();
    assert!(svc.get_user_permissions(first).await.unwrap().is_empty());
    db.update_role(role, None, None, Some(view_books.as_slice())).await.unwrap();

    for user in [first, second] {
        assert!(!svc.has_permission(user, Action::BorrowBook).await.unwrap());
        assert!(!svc.has_permission(user, Action::ReturnBook).await.unwrap());
        assert!(svc.has_permission(user, Action::ViewBooks).await.unwrap());
    }
}

#[tokio::test]
async fn test_unknown_user_has_no_permissions() {
    let test_db = setup_test_db().await;
    let svc = permission_service(test_db.db());

    assert!(!svc.has_permission(9999, Action::ViewPosts).await.unwrap());
    assert!(!svc.has_any_permission(9999, &[Action::ViewPosts]).await.unwrap());
    assert!(svc.get_user_permissions(9999).await.unwrap().is_empty());
    assert!(svc.has_all_permissions(9999, &[]).await.unwrap());
}

#[tokio::test]
async fn test_role_without_grants_resolves_to_empty_set() {
    let test_db = setup_test_db().await;
    let db = test_db.db();

    let role = create_test_role(db, "empty", &[]).await;
    let user = create_test_user(db, "nobody", role).await;

    let grants = db
        .find_role_and_permissions_for_user(user)
        .await
        .unwrap()
        .expect("user exists");
    assert_eq!(grants.role_id, role);
    assert!(grants.actions.is_empty());
    assert!(db.find_role_and_permissions_for_user(424242).await.unwrap().is_none());
}

#[tokio::test]
async fn test_admin_holds_every_action() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let svc = permission_service(db);

    let admin = create_system_user(db, "root", SystemRole::Admin).await;
    assert!(svc.has_all_permissions(admin, Action::ALL).await.unwrap());
    assert_eq!(
        svc.get_user_permissions(admin).await.unwrap().len(),
        Action::ALL.len()
    );
}

#[tokio::test]
async fn test_reseeding_restores_admin_grants_and_keeps_member_edits() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let svc = permission_service(db);

    let admin = create_system_user(db, "root", SystemRole::Admin).await;
    let member = create_system_user(db, "kim", SystemRole::Member).await;

    db.update_role(role_id(db, "admin").await, None, None, Some(&[][..]))
        .await
        .unwrap();
    let only_posts = permission_ids(db, &[Action::ViewPosts]).await;
    db.update_role(role_id(db, "member").await, None, None, Some(only_posts.as_slice()))
        .await
        .unwrap();
    assert!(!svc.has_permission(admin, Action::DeleteRole).await.unwrap());

    bootstrap::seed_catalog(db).await.unwrap();

    assert!(svc.has_all_permissions(admin, Action::ALL).await.unwrap());
    // Member grants were edited after creation and must survive the restart.
    assert!(!svc.has_permission(member, Action::CreatePost).await.unwrap());
    assert!(svc.has_permission(member, Action::ViewPosts).await.unwrap());
}

#[tokio::test]
async fn test_non_member_defaults_are_read_only() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let svc = permission_service(db);

    let guest = create_system_user(db, "guest", SystemRole::NonMember).await;
    assert!(svc.has_permission(guest, Action::ViewPosts).await.unwrap());
    assert!(!svc.has_permission(guest, Action::CreatePost).await.unwrap());
    assert!(!svc.has_permission(guest, Action::CreateComment).await.unwrap());
}

#[tokio::test]
async fn test_ownership_or_override() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let svc = permission_service(db);

    let member = create_system_user(db, "kim", SystemRole::Member).await;
    let admin = create_system_user(db, "root", SystemRole::Admin).await;

    assert!(svc.can_modify_resource(member, member, Action::EditAnyPost).await.unwrap());
    assert!(!svc.can_modify_resource(member, admin, Action::EditAnyPost).await.unwrap());
    assert!(svc.can_modify_resource(admin, member, Action::EditAnyPost).await.unwrap());
}

#[tokio::test]
async fn test_closed_store_is_reported_not_denied() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let svc = permission_service(db);
    let member = create_system_user(db, "kim", SystemRole::Member).await;

    db.pool().close().await;

    match svc.has_permission(member, Action::ViewPosts).await {
        Err(DomainError::StoreUnavailable(_)) => {}
        other => panic!("Expected StoreUnavailable, got: {:?}", other),
    }
    match svc.require_permission(member, Action::ViewPosts).await {
        Err(DomainError::StoreUnavailable(_)) => {}
        other => panic!("Expected StoreUnavailable, got: {:?}", other),
    }
}
