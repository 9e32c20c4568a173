#![allow(dead_code)]
use ikeeper::bootstrap;
use ikeeper::config::Config;
use ikeeper::domain::entities::{NewUser, UserStatus};
use ikeeper::domain::permissions::{Action, SystemRole};
use ikeeper::domain::ports::role_repository::RoleRepository;
use ikeeper::domain::ports::user_repository::UserRepository;
use ikeeper::domain::services::{HashCost, SecretHasher};
use ikeeper::infrastructure::http::middleware::AppState;
use ikeeper::infrastructure::persistence::Database;

pub const TEST_SECRET: &str = "test-secret-test-secret-test-secret!";
pub const TEST_PASSWORD: &str = "Secret!Pass1";

/// Minimum Argon2 cost keeps the suites fast.
pub const CHEAP_COST: HashCost = HashCost {
    memory_kib: 8,
    iterations: 1,
    parallelism: 1,
};

pub fn cheap_hasher() -> SecretHasher {
    SecretHasher::new(CHEAP_COST).expect("valid cost")
}

pub fn test_config() -> Config {
    Config::from_lookup(|key| {
        match key {
            "JWT_SECRET" => Some(TEST_SECRET),
            "PASSWORD_HASH_MEMORY_KIB" => Some("8"),
            "PASSWORD_HASH_ITERATIONS" => Some("1"),
            "ADMIN_EMAIL" => Some("admin@example.com"),
            "ADMIN_PASSWORD" => Some("Admin!2345"),
            _ => None,
        }
        .map(str::to_string)
    })
    .expect("valid test config")
}

pub fn build_state(db: &Database) -> AppState {
    bootstrap::build_app_state(db.clone(), &test_config()).expect("Failed to build app state")
}

pub async fn role_id(db: &Database, name: &str) -> i64 {
    db.get_role_by_name(name)
        .await
        .expect("role lookup")
        .unwrap_or_else(|| panic!("role {} missing", name))
        .id
}

pub async fn permission_ids(db: &Database, actions: &[Action]) -> Vec<i64> {
    let catalog = db.list_permissions().await.expect("list permissions");
    actions
        .iter()
        .map(|action| {
            catalog
                .iter()
                .find(|p| p.action == action.as_str())
                .unwrap_or_else(|| panic!("{} not seeded", action))
                .id
        })
        .collect()
}

/// Creates a role granting exactly `actions`.
pub async fn create_test_role(db: &Database, name: &str, actions: &[Action]) -> i64 {
    let ids = permission_ids(db, actions).await;
    db.create_role(name, Some("Test role"), &ids)
        .await
        .expect("Failed to create test role")
}

/// Creates an active user with `TEST_PASSWORD` in the given role.
pub async fn create_test_user(db: &Database, login_id: &str, role_id: i64) -> i64 {
    create_test_user_with_status(db, login_id, role_id, UserStatus::Active).await
}

pub async fn create_test_user_with_status(
    db: &Database,
    login_id: &str,
    role_id: i64,
    status: UserStatus,
) -> i64 {
    let password_hash = cheap_hasher()
        .hash_secret(TEST_PASSWORD)
        .expect("Failed to hash password");

    db.create_user(&NewUser {
        login_id: login_id.to_string(),
        password_hash,
        name: format!("User {}", login_id),
        email: format!("{}@example.com", login_id),
        status,
        role_id,
    })
    .await
    .expect("Failed to create user")
}

pub async fn create_system_user(db: &Database, login_id: &str, role: SystemRole) -> i64 {
    let role_id = role_id(db, role.name()).await;
    create_test_user(db, login_id, role_id).await
}
