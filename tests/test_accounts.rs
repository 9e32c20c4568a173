mod helpers;
use helpers::*;
use ikeeper::domain::entities::{
    ChangePasswordRequest, LoginRequest, RegisterRequest, UpdateUserRequest, UserStatus,
};
use ikeeper::domain::errors::DomainError;
use ikeeper::domain::permissions::{Action, SystemRole};
use ikeeper::domain::ports::user_repository::UserRepository;

fn register_request(login_id: &str) -> RegisterRequest {
    RegisterRequest {
        login_id: login_id.to_string(),
        email: format!("{}@Example.com", login_id),
        password: TEST_PASSWORD.to_string(),
        name: format!("Student {}", login_id),
    }
}

fn login_request(login_id: &str, password: &str) -> LoginRequest {
    LoginRequest {
        login_id: login_id.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_registration_starts_pending_non_member() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = build_state(db);

    let user = state
        .auth_service
        .register(register_request("newbie"))
        .await
        .expect("Failed to register");

    assert_eq!(user.status, UserStatus::PendingApproval);
    assert_eq!(user.role, "non-member");
    assert_eq!(user.email, "newbie@example.com");

    // Pending accounts cannot log in yet.
    match state
        .auth_service
        .login(login_request("newbie", TEST_PASSWORD))
        .await
    {
        Err(DomainError::Forbidden(msg)) => assert!(msg.contains("pending")),
        other => panic!("Expected Forbidden, got: {:?}", other.map(|r| r.user.login_id)),
    }
}

#[tokio::test]
async fn test_registration_rejects_taken_login_or_email() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = build_state(db);
    create_system_user(db, "kim", SystemRole::Member).await;

    let same_login = state.auth_service.register(register_request("kim")).await;
    assert!(matches!(same_login, Err(DomainError::Conflict(_))));

    let mut same_email = register_request("kim2");
    same_email.email = "KIM@example.com".to_string();
    let result = state.auth_service.register(same_email).await;
    assert!(matches!(result, Err(DomainError::Conflict(_))));
}

#[tokio::test]
async fn test_registration_validates_input() {
    let test_db = setup_test_db().await;
    let state = build_state(test_db.db());

    let mut weak = register_request("weakling");
    weak.password = "password".to_string();
    assert!(matches!(
        state.auth_service.register(weak).await,
        Err(DomainError::ValidationError(_))
    ));

    let mut bad_email = register_request("mailless");
    bad_email.email = "not-an-email".to_string();
    assert!(matches!(
        state.auth_service.register(bad_email).await,
        Err(DomainError::ValidationError(_))
    ));

    assert!(matches!(
        state.auth_service.register(register_request("x")).await,
        Err(DomainError::ValidationError(_))
    ));
}

#[tokio::test]
async fn test_login_issues_verifiable_token() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = build_state(db);
    let user_id = create_system_user(db, "kim", SystemRole::Member).await;

    let response = state
        .auth_service
        .login(login_request("kim", TEST_PASSWORD))
        .await
        .expect("Failed to login");

    assert_eq!(response.user.id, user_id);
    let claims = state
        .tokens
        .verify_token(&response.access_token)
        .expect("token verifies");
    assert_eq!(claims.user_id, user_id);
    assert_eq!(claims.role_id, role_id(db, "member").await);
}

#[tokio::test]
async fn test_login_failures_look_identical() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = build_state(db);
    create_system_user(db, "kim", SystemRole::Member).await;

    let wrong_password = state
        .auth_service
        .login(login_request("kim", "Wrong!Pass1"))
        .await;
    let unknown_user = state
        .auth_service
        .login(login_request("ghost", TEST_PASSWORD))
        .await;

    assert!(matches!(wrong_password, Err(DomainError::InvalidCredential)));
    assert!(matches!(unknown_user, Err(DomainError::InvalidCredential)));
}

#[tokio::test]
async fn test_inactive_user_cannot_login() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = build_state(db);
    let member = role_id(db, "member").await;
    create_test_user_with_status(db, "gone", member, UserStatus::Withdrawn).await;

    assert!(matches!(
        state
            .auth_service
            .login(login_request("gone", TEST_PASSWORD))
            .await,
        Err(DomainError::Forbidden(_))
    ));
}

#[tokio::test]
async fn test_approve_registration_makes_active_member() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = build_state(db);
    let admin = create_system_user(db, "root", SystemRole::Admin).await;

    let pending = state
        .auth_service
        .register(register_request("newbie"))
        .await
        .unwrap();

    let queue = state.user_service.list_pending(admin).await.unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].id, pending.id);

    let approved = state
        .user_service
        .review_registration(admin, pending.id, true)
        .await
        .unwrap()
        .expect("approved user returned");
    assert_eq!(approved.status, UserStatus::Active);
    assert_eq!(approved.role, "member");

    assert!(state
        .permission_service
        .has_permission(pending.id, Action::CreatePost)
        .await
        .unwrap());
    assert!(state
        .auth_service
        .login(login_request("newbie", TEST_PASSWORD))
        .await
        .is_ok());

    // A second review is refused because the user is no longer pending.
    assert!(matches!(
        state
            .user_service
            .review_registration(admin, pending.id, true)
            .await,
        Err(DomainError::ValidationError(_))
    ));
}

#[tokio::test]
async fn test_reject_registration_deletes_user() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = build_state(db);
    let admin = create_system_user(db, "root", SystemRole::Admin).await;

    let pending = state
        .auth_service
        .register(register_request("spammer"))
        .await
        .unwrap();

    let result = state
        .user_service
        .review_registration(admin, pending.id, false)
        .await
        .unwrap();
    assert!(result.is_none());
    assert!(db.get_user_by_id(pending.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_member_cannot_review_registrations() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = build_state(db);
    let member = create_system_user(db, "kim", SystemRole::Member).await;
    let pending = state
        .auth_service
        .register(register_request("newbie"))
        .await
        .unwrap();

    match state
        .user_service
        .review_registration(member, pending.id, true)
        .await
    {
        Err(DomainError::PermissionDenied(action)) => assert_eq!(action, "approve_users"),
        other => panic!("Expected PermissionDenied, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_change_password() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = build_state(db);
    let user_id = create_system_user(db, "kim", SystemRole::Member).await;

    let wrong = state
        .auth_service
        .change_password(
            user_id,
            ChangePasswordRequest {
                current_password: "Not!ThePass1".to_string(),
                new_password: "Fresh!Pass22".to_string(),
            },
        )
        .await;
    assert!(matches!(wrong, Err(DomainError::ValidationError(_))));

    state
        .auth_service
        .change_password(
            user_id,
            ChangePasswordRequest {
                current_password: TEST_PASSWORD.to_string(),
                new_password: "Fresh!Pass22".to_string(),
            },
        )
        .await
        .expect("Failed to change password");

    assert!(state
        .auth_service
        .login(login_request("kim", TEST_PASSWORD))
        .await
        .is_err());
    assert!(state
        .auth_service
        .login(login_request("kim", "Fresh!Pass22"))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_profile_lists_granted_actions() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = build_state(db);
    let role = create_test_role(db, "reader", &[Action::ViewPosts, Action::ViewBooks]).await;
    let user_id = create_test_user(db, "reader1", role).await;

    let profile = state.auth_service.profile(user_id).await.unwrap();
    assert_eq!(profile.user.login_id, "reader1");
    assert_eq!(profile.permissions, vec!["view_books", "view_posts"]);
}

#[tokio::test]
async fn test_list_users_excludes_non_members() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = build_state(db);
    let admin = create_system_user(db, "root", SystemRole::Admin).await;
    create_system_user(db, "kim", SystemRole::Member).await;
    create_system_user(db, "guest", SystemRole::NonMember).await;

    let users = state.user_service.list_users(admin).await.unwrap();
    let mut logins: Vec<&str> = users.iter().map(|u| u.login_id.as_str()).collect();
    logins.sort();
    assert_eq!(logins, vec!["kim", "root"]);
}

#[tokio::test]
async fn test_update_user_status_and_role() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = build_state(db);
    let admin = create_system_user(db, "root", SystemRole::Admin).await;
    let kim = create_system_user(db, "kim", SystemRole::Member).await;
    let treasurer = create_test_role(db, "treasurer", &[Action::ManageFees]).await;

    let updated = state
        .user_service
        .update_user(
            admin,
            kim,
            UpdateUserRequest {
                status: Some(UserStatus::Inactive),
                role_id: Some(treasurer),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, UserStatus::Inactive);
    assert_eq!(updated.role, "treasurer");

    let empty = state
        .user_service
        .update_user(
            admin,
            kim,
            UpdateUserRequest {
                status: None,
                role_id: None,
            },
        )
        .await;
    assert!(matches!(empty, Err(DomainError::ValidationError(_))));

    let unknown_role = state
        .user_service
        .update_user(
            admin,
            kim,
            UpdateUserRequest {
                status: None,
                role_id: Some(9999),
            },
        )
        .await;
    assert!(matches!(unknown_role, Err(DomainError::ValidationError(_))));
}

#[tokio::test]
async fn test_delete_user_rules() {
    let test_db = setup_test_db().await;
    let db = test_db.db();
    let state = build_state(db);
    let admin = create_system_user(db, "root", SystemRole::Admin).await;
    let kim = create_system_user(db, "kim", SystemRole::Member).await;

    assert!(matches!(
        state.user_service.delete_user(admin, admin).await,
        Err(DomainError::ValidationError(_))
    ));
    assert!(matches!(
        state.user_service.delete_user(kim, admin).await,
        Err(DomainError::PermissionDenied(_))
    ));

    state.user_service.delete_user(admin, kim).await.unwrap();
    assert!(matches!(
        state.user_service.get_user(admin, kim).await,
        Err(DomainError::NotFound(_))
    ));
    assert!(matches!(
        state.user_service.delete_user(admin, kim).await,
        Err(DomainError::NotFound(_))
    ));
}
