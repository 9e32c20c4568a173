use crate::application::services::PermissionService;
use crate::domain::entities::{
    ChangePasswordRequest, LoginRequest, LoginResponse, NewUser, ProfileResponse,
    RegisterRequest, User, UserResponse, UserStatus,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::permissions::SystemRole;
use crate::domain::ports::role_repository::RoleRepository;
use crate::domain::ports::user_repository::UserRepository;
use crate::domain::services::{validate_password_complexity, Claims, SecretHasher, TokenService};
use crate::shared::utils::{validate_and_normalize_email, validate_login_id, validate_text};
use std::sync::Arc;

/// Self-service account flows: registration, login, profile and password.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    hasher: SecretHasher,
    tokens: TokenService,
    permissions: PermissionService,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        hasher: SecretHasher,
        tokens: TokenService,
        permissions: PermissionService,
    ) -> Self {
        Self {
            users,
            roles,
            hasher,
            tokens,
            permissions,
        }
    }

    /// New accounts start as pending non-members until an admin approves them.
    pub async fn register(&self, request: RegisterRequest) -> DomainResult<UserResponse> {
        let login_id = validate_login_id(&request.login_id)?;
        let email = validate_and_normalize_email(&request.email)?;
        let name = validate_text("Name", &request.name, 2, 50)?;
        validate_password_complexity(&request.password)?;

        if self.users.login_id_or_email_taken(&login_id, &email).await? {
            return Err(DomainError::Conflict(
                "Login ID or email is already registered".to_string(),
            ));
        }

        let non_member = self
            .roles
            .get_role_by_name(SystemRole::NonMember.name())
            .await?
            .ok_or_else(|| DomainError::Internal("Non-member role is missing".to_string()))?;

        let password_hash = self.hasher.hash_secret(&request.password)?;
        let id = self
            .users
            .create_user(&NewUser {
                login_id,
                password_hash,
                name,
                email,
                status: UserStatus::PendingApproval,
                role_id: non_member.id,
            })
            .await?;

        let user = self.find_user(id).await?;
        tracing::info!("Registered user {} ({}) pending approval", user.login_id, id);
        Ok(user.into())
    }

    pub async fn login(&self, request: LoginRequest) -> DomainResult<LoginResponse> {
        let login_id = request.login_id.trim();
        let found = self.users.get_user_by_login_id(login_id).await?;

        // Unknown login ids pay for a verification too, so timing does not
        // reveal which accounts exist.
        let verified = match &found {
            Some(user) => self.hasher.verify_secret(&request.password, &user.password_hash),
            None => self.hasher.verify_decoy(&request.password),
        };

        let user = match found {
            Some(user) if verified => user,
            _ => {
                // Same answer for unknown login id and wrong password.
                record_failure("bad_credentials");
                tracing::warn!("Failed login attempt for '{}'", login_id);
                return Err(DomainError::InvalidCredential);
            }
        };

        match user.status {
            UserStatus::Active => {}
            UserStatus::PendingApproval => {
                record_failure("pending_approval");
                return Err(DomainError::Forbidden(
                    "Your account is pending approval".to_string(),
                ));
            }
            UserStatus::Inactive | UserStatus::Withdrawn => {
                record_failure("account_disabled");
                return Err(DomainError::Forbidden(
                    "Your account is inactive or withdrawn".to_string(),
                ));
            }
        }

        let claims = Claims::new(user.id, user.role_id)
            .with_field("loginId", user.login_id.as_str())
            .with_field("email", user.email.as_str());
        let access_token = self.tokens.issue_token(claims);

        tracing::info!("User {} logged in", user.id);
        Ok(LoginResponse {
            message: "Login successful".to_string(),
            user: user.into(),
            access_token,
        })
    }

    pub async fn profile(&self, user_id: i64) -> DomainResult<ProfileResponse> {
        let user = self.find_user(user_id).await?;
        let permissions = self.permissions.get_user_permissions(user_id).await?;

        Ok(ProfileResponse {
            user: user.into(),
            permissions: permissions.into_iter().collect(),
        })
    }

    pub async fn change_password(
        &self,
        user_id: i64,
        request: ChangePasswordRequest,
    ) -> DomainResult<()> {
        let user = self.find_user(user_id).await?;

        if !self
            .hasher
            .verify_secret(&request.current_password, &user.password_hash)
        {
            record_failure("bad_current_password");
            return Err(DomainError::ValidationError(
                "Current password is incorrect".to_string(),
            ));
        }

        validate_password_complexity(&request.new_password)?;
        let password_hash = self.hasher.hash_secret(&request.new_password)?;
        self.users.update_password_hash(user_id, &password_hash).await?;

        tracing::info!("User {} changed password", user_id);
        Ok(())
    }

    async fn find_user(&self, id: i64) -> DomainResult<User> {
        self.users
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("User not found".to_string()))
    }
}

fn record_failure(reason: &'static str) {
    metrics::counter!("auth_failures_total", "reason" => reason).increment(1);
}
