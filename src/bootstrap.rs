use crate::application::services::*;
use crate::config::Config;
use crate::domain::entities::{NewUser, UserStatus};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::permissions::{Action, SystemRole};
use crate::domain::ports::award_repository::AwardRepository;
use crate::domain::ports::education_repository::EducationRepository;
use crate::domain::ports::permission_store::PermissionStore;
use crate::domain::ports::post_repository::PostRepository;
use crate::domain::ports::role_repository::RoleRepository;
use crate::domain::ports::user_repository::UserRepository;
use crate::domain::services::{validate_password_complexity, SecretHasher, TokenService};
use crate::infrastructure::http::middleware::AppState;
use crate::infrastructure::persistence::Database;
use crate::shared::utils::{validate_and_normalize_email, validate_login_id};
use std::sync::Arc;

const DEFAULT_CATEGORIES: [(&str, &str); 4] = [
    ("Announcements", "Official club announcements"),
    ("Events", "Upcoming events and activities"),
    ("Study", "Study groups and learning resources"),
    ("General", "General discussion"),
];

pub fn build_app_state(db: Database, config: &Config) -> DomainResult<AppState> {
    let hasher = SecretHasher::new(config.hash_cost)?;
    let tokens = TokenService::new(config.jwt_secret.as_bytes(), config.token_lifetime_secs);

    let permission_service =
        PermissionService::new(Arc::new(db.clone()) as Arc<dyn PermissionStore>);
    let users = Arc::new(db.clone()) as Arc<dyn UserRepository>;
    let roles = Arc::new(db.clone()) as Arc<dyn RoleRepository>;

    let auth_service = AuthService::new(
        users.clone(),
        roles.clone(),
        hasher,
        tokens.clone(),
        permission_service.clone(),
    );
    let user_service = UserService::new(users, roles.clone(), permission_service.clone());
    let role_service = RoleService::new(roles, permission_service.clone());
    let post_service = PostService::new(
        Arc::new(db.clone()) as Arc<dyn PostRepository>,
        permission_service.clone(),
    );
    let award_service = AwardService::new(
        Arc::new(db.clone()) as Arc<dyn AwardRepository>,
        permission_service.clone(),
    );
    let education_service = EducationService::new(
        Arc::new(db) as Arc<dyn EducationRepository>,
        permission_service.clone(),
    );

    Ok(AppState {
        tokens,
        cookie_secure: config.cookie_secure,
        permission_service,
        auth_service,
        user_service,
        role_service,
        post_service,
        award_service,
        education_service,
    })
}

/// Brings the permission catalog and the reserved roles up to date.
///
/// Safe to run on every start. Roles get their default grants only when
/// they are first created, so later edits survive restarts; the admin role
/// is re-granted the whole catalog every time.
pub async fn seed_catalog(db: &Database) -> DomainResult<()> {
    for action in Action::ALL {
        db.ensure_permission(*action).await?;
    }

    for role in SystemRole::ALL {
        let (role_id, created) = db.ensure_role(role.name(), role.description()).await?;
        if created {
            tracing::info!("Created system role '{}'", role.name());
            db.grant_actions(role_id, &role.default_grants()).await?;
        }
        if role == SystemRole::Admin {
            db.grant_actions(role_id, Action::ALL).await?;
        }
    }

    tracing::info!("Permission catalog seeded ({} actions)", Action::ALL.len());
    Ok(())
}

pub async fn initialize_admin(
    db: &Database,
    config: &Config,
    hasher: &SecretHasher,
) -> DomainResult<()> {
    tracing::info!("Checking for admin user initialization");

    let login_id = validate_login_id(&config.admin_login_id)?;

    if db.get_user_by_login_id(&login_id).await?.is_some() {
        tracing::info!("Admin user already exists: {}", login_id);
        return Ok(());
    }

    tracing::info!("Creating admin user: {}", login_id);

    validate_password_complexity(&config.admin_password)?;
    let email = validate_and_normalize_email(&config.admin_email)?;
    let password_hash = hasher.hash_secret(&config.admin_password)?;

    let admin_role = db
        .get_role_by_name(SystemRole::Admin.name())
        .await?
        .ok_or_else(|| DomainError::Internal("Admin role not found in seed data".to_string()))?;

    db.create_user(&NewUser {
        login_id: login_id.clone(),
        password_hash,
        name: "Administrator".to_string(),
        email,
        status: UserStatus::Active,
        role_id: admin_role.id,
    })
    .await?;

    tracing::info!("Admin user created successfully: {}", login_id);
    Ok(())
}

pub async fn seed_categories(db: &Database) -> DomainResult<()> {
    for (name, description) in DEFAULT_CATEGORIES {
        if db.get_category_by_name(name).await?.is_none() {
            db.create_category(name, Some(description)).await?;
            tracing::info!("Created default category '{}'", name);
        }
    }
    Ok(())
}

/// Runs every idempotent seeding step in dependency order.
pub async fn initialize(db: &Database, config: &Config) -> DomainResult<()> {
    seed_catalog(db).await?;
    let hasher = SecretHasher::new(config.hash_cost)?;
    initialize_admin(db, config, &hasher).await?;
    seed_categories(db).await
}
