mod helpers;
use helpers::*;
use ikeeper::domain::entities::{CreateRoleRequest, TransferRoleRequest, UpdateRoleRequest};
use ikeeper::domain::errors::DomainError;
use ikeeper::domain::permissions::{Action, SystemRole};
use ikeeper::domain::ports::user_repository::UserRepository;

fn create_request(name: &str, permission_ids: Vec<i64>) -> CreateRoleRequest {
    CreateRoleRequest {
        name: name.to_string(),
        description: Some("Test role".to_string()),
        permission_ids,
    }
}

#[tokio::test]
async fn test_create_role_and_reject_duplicate_name() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = build_state(db);
    let admin = create_system_user(db, "root", SystemRole::Admin).await;

    let ids = permission_ids(db, &[Action::ViewFees, Action::ManageFees]).await;
    let role = state
        .role_service
        .create_role(admin, create_request("treasurer", ids))
        .await
        .expect("Failed to create role");

    assert_eq!(role.name, "treasurer");
    assert_eq!(role.user_count, 0);
    let mut granted: Vec<&str> = role.permissions.iter().map(|p| p.action.as_str()).collect();
    granted.sort();
    assert_eq!(granted, vec!["manage_fees", "view_fees"]);

    let result = state
        .role_service
        .create_role(admin, create_request("treasurer", vec![]))
        .await;
    assert!(matches!(result, Err(DomainError::Conflict(_))));
}

#[tokio::test]
async fn test_create_role_rejects_unknown_permission_ids() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = build_state(db);
    let admin = create_system_user(db, "root", SystemRole::Admin).await;

    let result = state
        .role_service
        .create_role(admin, create_request("ghost", vec![999_999]))
        .await;

    match result {
        Err(DomainError::ValidationError(msg)) => assert!(msg.contains("999999")),
        other => panic!("Expected ValidationError, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_create_role_rejects_blank_name() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = build_state(db);
    let admin = create_system_user(db, "root", SystemRole::Admin).await;

    let result = state
        .role_service
        .create_role(admin, create_request("   ", vec![]))
        .await;
    assert!(matches!(result, Err(DomainError::ValidationError(_))));
}

#[tokio::test]
async fn test_member_cannot_manage_roles() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = build_state(db);
    let member = create_system_user(db, "kim", SystemRole::Member).await;

    match state
        .role_service
        .create_role(member, create_request("sneaky", vec![]))
        .await
    {
        Err(DomainError::PermissionDenied(action)) => assert_eq!(action, "create_role"),
        other => panic!("Expected PermissionDenied, got: {:?}", other),
    }
    assert!(matches!(
        state.role_service.list_roles(member).await,
        Err(DomainError::PermissionDenied(_))
    ));
}

#[tokio::test]
async fn test_admin_role_cannot_be_renamed() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = build_state(db);
    let admin = create_system_user(db, "root", SystemRole::Admin).await;
    let admin_role = role_id(db, "admin").await;

    let result = state
        .role_service
        .update_role(
            admin,
            admin_role,
            UpdateRoleRequest {
                name: Some("superuser".to_string()),
                description: None,
                permission_ids: None,
            },
        )
        .await;
    assert!(matches!(result, Err(DomainError::ValidationError(_))));

    // Description edits on the admin role are still allowed.
    let updated = state
        .role_service
        .update_role(
            admin,
            admin_role,
            UpdateRoleRequest {
                name: Some("admin".to_string()),
                description: Some("Club officers".to_string()),
                permission_ids: None,
            },
        )
        .await
        .expect("Failed to update admin description");
    assert_eq!(updated.description.as_deref(), Some("Club officers"));
}

#[tokio::test]
async fn test_admin_role_keeps_every_grant() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = build_state(db);
    let admin = create_system_user(db, "root", SystemRole::Admin).await;
    let admin_role = role_id(db, "admin").await;

    for partial in [Vec::new(), permission_ids(db, &[Action::ViewPosts]).await] {
        let result = state
            .role_service
            .update_role(
                admin,
                admin_role,
                UpdateRoleRequest {
                    name: None,
                    description: None,
                    permission_ids: Some(partial),
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }
    assert!(state
        .permission_service
        .has_all_permissions(admin, Action::ALL)
        .await
        .unwrap());

    let everything = permission_ids(db, Action::ALL).await;
    state
        .role_service
        .update_role(
            admin,
            admin_role,
            UpdateRoleRequest {
                name: None,
                description: None,
                permission_ids: Some(everything),
            },
        )
        .await
        .expect("Full catalog is accepted for the admin role");
    assert!(state
        .permission_service
        .has_permission(admin, Action::DeleteRole)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_update_role_replaces_grants() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = build_state(db);
    let admin = create_system_user(db, "root", SystemRole::Admin).await;
    let librarian = create_test_role(db, "librarian", &[Action::BorrowBook]).await;
    let user = create_test_user(db, "lib1", librarian).await;

    let ids = permission_ids(db, &[Action::ViewBooks]).await;
    let updated = state
        .role_service
        .update_role(
            admin,
            librarian,
            UpdateRoleRequest {
                name: Some("archivist".to_string()),
                description: None,
                permission_ids: Some(ids),
            },
        )
        .await
        .expect("Failed to update role");

    assert_eq!(updated.name, "archivist");
    assert_eq!(updated.user_count, 1);
    assert!(!state
        .permission_service
        .has_permission(user, Action::BorrowBook)
        .await
        .unwrap());
    assert!(state
        .permission_service
        .has_permission(user, Action::ViewBooks)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_rename_to_existing_name_conflicts() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = build_state(db);
    let admin = create_system_user(db, "root", SystemRole::Admin).await;
    let role = create_test_role(db, "editor", &[]).await;

    let result = state
        .role_service
        .update_role(
            admin,
            role,
            UpdateRoleRequest {
                name: Some("member".to_string()),
                description: None,
                permission_ids: None,
            },
        )
        .await;
    assert!(matches!(result, Err(DomainError::Conflict(_))));
}

#[tokio::test]
async fn test_reserved_roles_cannot_be_deleted() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = build_state(db);
    let admin = create_system_user(db, "root", SystemRole::Admin).await;

    for role in SystemRole::ALL {
        let id = role_id(db, role.name()).await;
        let result = state.role_service.delete_role(admin, id).await;
        assert!(
            matches!(result, Err(DomainError::ValidationError(_))),
            "{} should not be deletable",
            role.name()
        );
    }
}

#[tokio::test]
async fn test_role_in_use_cannot_be_deleted() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = build_state(db);
    let admin = create_system_user(db, "root", SystemRole::Admin).await;
    let role = create_test_role(db, "treasurer", &[Action::ViewFees]).await;
    create_test_user(db, "cash", role).await;

    match state.role_service.delete_role(admin, role).await {
        Err(DomainError::ValidationError(msg)) => assert!(msg.contains("1 user(s)")),
        other => panic!("Expected ValidationError, got: {:?}", other),
    }

    let unused = create_test_role(db, "retired", &[Action::ViewFees]).await;
    state
        .role_service
        .delete_role(admin, unused)
        .await
        .expect("Failed to delete unused role");
    assert!(matches!(
        state.role_service.get_role(admin, unused).await,
        Err(DomainError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_transfer_role_moves_holder() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = build_state(db);
    let admin = create_system_user(db, "root", SystemRole::Admin).await;
    let treasurer = create_test_role(db, "treasurer", &[Action::ManageFees]).await;
    let outgoing = create_test_user(db, "old_cash", treasurer).await;
    let incoming = create_system_user(db, "new_cash", SystemRole::Member).await;

    state
        .role_service
        .transfer_role(
            admin,
            TransferRoleRequest {
                from_user_id: outgoing,
                to_user_id: incoming,
                role_id: treasurer,
            },
        )
        .await
        .expect("Failed to transfer role");

    let member = role_id(db, "member").await;
    let old = db.get_user_by_id(outgoing).await.unwrap().unwrap();
    let new = db.get_user_by_id(incoming).await.unwrap().unwrap();
    assert_eq!(old.role_id, member);
    assert_eq!(new.role_id, treasurer);

    assert!(!state
        .permission_service
        .has_permission(outgoing, Action::ManageFees)
        .await
        .unwrap());
    assert!(state
        .permission_service
        .has_permission(incoming, Action::ManageFees)
        .await
        .unwrap());
}

#[tokio::test]
async fn test_transfer_role_failures_change_nothing() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = build_state(db);
    let admin = create_system_user(db, "root", SystemRole::Admin).await;
    let treasurer = create_test_role(db, "treasurer", &[Action::ManageFees]).await;
    let holder = create_test_user(db, "cash", treasurer).await;
    let member = create_system_user(db, "kim", SystemRole::Member).await;
    let guest = create_system_user(db, "guest", SystemRole::NonMember).await;
    let member_role = role_id(db, "member").await;

    let cases = [
        // Target is not a member.
        (holder, guest, treasurer),
        // Source does not hold the role.
        (member, holder, treasurer),
        // Unknown users.
        (9999, member, treasurer),
        (holder, 9999, treasurer),
        // Same user on both ends.
        (holder, holder, treasurer),
        // The member role itself.
        (member, holder, member_role),
    ];

    for (from, to, role) in cases {
        let result = state
            .role_service
            .transfer_role(
                admin,
                TransferRoleRequest {
                    from_user_id: from,
                    to_user_id: to,
                    role_id: role,
                },
            )
            .await;
        assert!(
            matches!(
                result,
                Err(DomainError::ValidationError(_)) | Err(DomainError::NotFound(_))
            ),
            "transfer {} -> {} of role {} should fail, got {:?}",
            from,
            to,
            role,
            result
        );
    }

    assert_eq!(db.get_user_by_id(holder).await.unwrap().unwrap().role_id, treasurer);
    assert_eq!(db.get_user_by_id(member).await.unwrap().unwrap().role_id, member_role);
}

#[tokio::test]
async fn test_list_roles_reports_user_counts() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = build_state(db);
    let admin = create_system_user(db, "root", SystemRole::Admin).await;
    create_system_user(db, "kim", SystemRole::Member).await;
    create_system_user(db, "lee", SystemRole::Member).await;

    let roles = state.role_service.list_roles(admin).await.unwrap();
    let member = roles.iter().find(|r| r.name == "member").expect("member role");
    assert_eq!(member.user_count, 2);
    let admin_role = roles.iter().find(|r| r.name == "admin").expect("admin role");
    assert_eq!(admin_role.permissions.len(), Action::ALL.len());

    let catalog = state.role_service.list_permissions(admin).await.unwrap();
    assert_eq!(catalog.len(), Action::ALL.len());
}
