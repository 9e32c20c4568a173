use crate::application::services::PermissionService;
use crate::domain::entities::{UpdateUserRequest, User, UserResponse, UserStatus};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::permissions::{Action, SystemRole};
use crate::domain::ports::role_repository::RoleRepository;
use crate::domain::ports::user_repository::UserRepository;
use std::sync::Arc;

/// Administrative user management: approvals, listing, status and role edits.
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    permissions: PermissionService,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        permissions: PermissionService,
    ) -> Self {
        Self {
            users,
            roles,
            permissions,
        }
    }

    pub async fn list_pending(&self, actor_id: i64) -> DomainResult<Vec<UserResponse>> {
        self.permissions
            .require_permission(actor_id, Action::ViewPendingUsers)
            .await?;

        let users = self
            .users
            .list_users_by_status(UserStatus::PendingApproval)
            .await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    /// Approving activates the user as a member; rejecting deletes the
    /// registration. Returns the approved user, or `None` after a rejection.
    pub async fn review_registration(
        &self,
        actor_id: i64,
        user_id: i64,
        approve: bool,
    ) -> DomainResult<Option<UserResponse>> {
        self.permissions
            .require_permission(actor_id, Action::ApproveUsers)
            .await?;

        let user = self.find_user(user_id).await?;
        if user.status != UserStatus::PendingApproval {
            return Err(DomainError::ValidationError(
                "User is not pending approval".to_string(),
            ));
        }

        if !approve {
            self.users.delete_user(user_id).await?;
            tracing::info!("User {} rejected registration of {}", actor_id, user.login_id);
            return Ok(None);
        }

        let member = self.system_role_id(SystemRole::Member).await?;
        self.users
            .update_user_status_and_role(user_id, Some(UserStatus::Active), Some(member))
            .await?;

        tracing::info!("User {} approved registration of {}", actor_id, user.login_id);
        Ok(Some(self.find_user(user_id).await?.into()))
    }

    /// Everyone except non-members.
    pub async fn list_users(&self, actor_id: i64) -> DomainResult<Vec<UserResponse>> {
        self.permissions
            .require_permission(actor_id, Action::ViewAllUsers)
            .await?;

        let non_member = self.system_role_id(SystemRole::NonMember).await?;
        let users = self.users.list_users_excluding_role(non_member).await?;
        Ok(users.into_iter().map(UserResponse::from).collect())
    }

    pub async fn get_user(&self, actor_id: i64, user_id: i64) -> DomainResult<UserResponse> {
        self.permissions
            .require_permission(actor_id, Action::ViewUserDetails)
            .await?;

        Ok(self.find_user(user_id).await?.into())
    }

    pub async fn update_user(
        &self,
        actor_id: i64,
        user_id: i64,
        request: UpdateUserRequest,
    ) -> DomainResult<UserResponse> {
        self.permissions
            .require_permission(actor_id, Action::UpdateUser)
            .await?;

        if request.status.is_none() && request.role_id.is_none() {
            return Err(DomainError::ValidationError(
                "Nothing to update: provide status and/or roleId".to_string(),
            ));
        }

        self.find_user(user_id).await?;

        if let Some(role_id) = request.role_id {
            if self.roles.get_role_by_id(role_id).await?.is_none() {
                return Err(DomainError::ValidationError(
                    "Role does not exist".to_string(),
                ));
            }
        }

        self.users
            .update_user_status_and_role(user_id, request.status, request.role_id)
            .await?;

        tracing::info!(
            "User {} updated user {} (status: {:?}, role: {:?})",
            actor_id,
            user_id,
            request.status,
            request.role_id
        );
        Ok(self.find_user(user_id).await?.into())
    }

    pub async fn delete_user(&self, actor_id: i64, user_id: i64) -> DomainResult<()> {
        self.permissions
            .require_permission(actor_id, Action::DeleteUser)
            .await?;

        if actor_id == user_id {
            return Err(DomainError::ValidationError(
                "You cannot delete your own account".to_string(),
            ));
        }

        self.find_user(user_id).await?;
        self.users.delete_user(user_id).await?;

        tracing::info!("User {} deleted user {}", actor_id, user_id);
        Ok(())
    }

    async fn find_user(&self, id: i64) -> DomainResult<User> {
        self.users
            .get_user_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("User not found".to_string()))
    }

    async fn system_role_id(&self, role: SystemRole) -> DomainResult<i64> {
        self.roles
            .get_role_by_name(role.name())
            .await?
            .map(|r| r.id)
            .ok_or_else(|| {
                DomainError::Internal(format!("System role '{}' is missing", role.name()))
            })
    }
}
