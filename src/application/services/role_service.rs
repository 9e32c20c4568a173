use crate::application::services::PermissionService;
use crate::domain::entities::{
    CreateRoleRequest, Permission, Role, RoleResponse, TransferRoleRequest, UpdateRoleRequest,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::permissions::{Action, SystemRole};
use crate::domain::ports::role_repository::RoleRepository;
use crate::shared::utils::validate_text;
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Clone)]
pub struct RoleService {
    roles: Arc<dyn RoleRepository>,
    permissions: PermissionService,
}

impl RoleService {
    pub fn new(roles: Arc<dyn RoleRepository>, permissions: PermissionService) -> Self {
        Self { roles, permissions }
    }

    pub async fn list_roles(&self, actor_id: i64) -> DomainResult<Vec<RoleResponse>> {
        self.permissions
            .require_permission(actor_id, Action::ViewRoles)
            .await?;

        let roles = self.roles.list_roles().await?;
        Ok(roles.into_iter().map(RoleResponse::from).collect())
    }

    pub async fn get_role(&self, actor_id: i64, id: i64) -> DomainResult<RoleResponse> {
        self.permissions
            .require_permission(actor_id, Action::ViewRoles)
            .await?;

        Ok(self.find_role(id).await?.into())
    }

    /// The permission catalog, for building grant lists.
    pub async fn list_permissions(&self, actor_id: i64) -> DomainResult<Vec<Permission>> {
        self.permissions
            .require_permission(actor_id, Action::ViewRoles)
            .await?;

        self.roles.list_permissions().await
    }

    pub async fn create_role(
        &self,
        actor_id: i64,
        request: CreateRoleRequest,
    ) -> DomainResult<RoleResponse> {
        self.permissions
            .require_permission(actor_id, Action::CreateRole)
            .await?;

        let name = validate_text("Role name", &request.name, 1, 50)?;
        self.ensure_name_available(&name, None).await?;
        let permission_ids = self.check_permission_ids(&request.permission_ids).await?;

        let id = self
            .roles
            .create_role(&name, request.description.as_deref(), &permission_ids)
            .await?;

        tracing::info!("User {} created role '{}' ({})", actor_id, name, id);
        Ok(self.find_role(id).await?.into())
    }

    /// When `permission_ids` is present the role's grants are replaced as a
    /// whole, in the same transaction as the field changes.
    pub async fn update_role(
        &self,
        actor_id: i64,
        id: i64,
        request: UpdateRoleRequest,
    ) -> DomainResult<RoleResponse> {
        self.permissions
            .require_permission(actor_id, Action::UpdateRole)
            .await?;

        let role = self.find_role(id).await?;

        let name = match request.name.as_deref() {
            Some(raw) => {
                let name = validate_text("Role name", raw, 1, 50)?;
                if role.name == SystemRole::Admin.name() && name != role.name {
                    return Err(DomainError::ValidationError(
                        "The admin role cannot be renamed".to_string(),
                    ));
                }
                if name != role.name {
                    self.ensure_name_available(&name, Some(id)).await?;
                }
                Some(name)
            }
            None => None,
        };

        let permission_ids = match request.permission_ids.as_deref() {
            Some(ids) => {
                let ids = self.check_permission_ids(ids).await?;
                if role.name == SystemRole::Admin.name() {
                    self.ensure_full_catalog(&ids).await?;
                }
                Some(ids)
            }
            None => None,
        };

        self.roles
            .update_role(
                id,
                name.as_deref(),
                request.description.as_deref(),
                permission_ids.as_deref(),
            )
            .await?;

        if let Some(ids) = &permission_ids {
            tracing::info!(
                "User {} replaced grants of role {} with {} permission(s)",
                actor_id,
                id,
                ids.len()
            );
        }

        Ok(self.find_role(id).await?.into())
    }

    pub async fn delete_role(&self, actor_id: i64, id: i64) -> DomainResult<()> {
        self.permissions
            .require_permission(actor_id, Action::DeleteRole)
            .await?;

        let role = self.find_role(id).await?;

        if SystemRole::is_reserved(&role.name) {
            return Err(DomainError::ValidationError(format!(
                "The system role '{}' cannot be deleted",
                role.name
            )));
        }

        let assigned = self.roles.count_users_with_role(id).await?;
        if assigned > 0 {
            return Err(DomainError::ValidationError(format!(
                "Cannot delete role: {} user(s) are assigned to it",
                assigned
            )));
        }

        self.roles.delete_role(id).await?;
        tracing::info!("User {} deleted role '{}' ({})", actor_id, role.name, id);
        Ok(())
    }

    /// Hands `role_id` from one user to a current member; the previous holder
    /// drops back to the member role. Both changes commit together.
    pub async fn transfer_role(
        &self,
        actor_id: i64,
        request: TransferRoleRequest,
    ) -> DomainResult<()> {
        self.permissions
            .require_permission(actor_id, Action::TransferRole)
            .await?;

        if request.from_user_id == request.to_user_id {
            return Err(DomainError::ValidationError(
                "Cannot transfer a role to the same user".to_string(),
            ));
        }

        let member = self
            .roles
            .get_role_by_name(SystemRole::Member.name())
            .await?
            .ok_or_else(|| DomainError::Internal("Member role is missing".to_string()))?;

        if request.role_id == member.id {
            return Err(DomainError::ValidationError(
                "The member role cannot be transferred".to_string(),
            ));
        }

        self.roles
            .transfer_role(
                request.from_user_id,
                request.to_user_id,
                request.role_id,
                member.id,
            )
            .await?;

        tracing::info!(
            "User {} transferred role {} from user {} to user {}",
            actor_id,
            request.role_id,
            request.from_user_id,
            request.to_user_id
        );
        Ok(())
    }

    async fn find_role(&self, id: i64) -> DomainResult<Role> {
        self.roles
            .get_role_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Role not found".to_string()))
    }

    async fn ensure_name_available(&self, name: &str, except_id: Option<i64>) -> DomainResult<()> {
        match self.roles.get_role_by_name(name).await? {
            Some(existing) if Some(existing.id) != except_id => Err(DomainError::Conflict(
                format!("Role name '{}' already exists", name),
            )),
            _ => Ok(()),
        }
    }

    /// The admin role always holds the whole catalog.
    async fn ensure_full_catalog(&self, ids: &[i64]) -> DomainResult<()> {
        let catalog = self.roles.list_permissions().await?;
        if catalog.iter().any(|p| !ids.contains(&p.id)) {
            return Err(DomainError::ValidationError(
                "The admin role must keep every permission".to_string(),
            ));
        }
        Ok(())
    }

    /// Deduplicates the ids and rejects any that are not in the catalog.
    async fn check_permission_ids(&self, ids: &[i64]) -> DomainResult<Vec<i64>> {
        let wanted: BTreeSet<i64> = ids.iter().copied().collect();
        let wanted: Vec<i64> = wanted.into_iter().collect();

        let found = self.roles.find_permissions_by_ids(&wanted).await?;
        if found.len() != wanted.len() {
            let known: BTreeSet<i64> = found.iter().map(|p| p.id).collect();
            let unknown: Vec<String> = wanted
                .iter()
                .filter(|id| !known.contains(id))
                .map(|id| id.to_string())
                .collect();
            return Err(DomainError::ValidationError(format!(
                "Unknown permission id(s): {}",
                unknown.join(", ")
            )));
        }

        Ok(wanted)
    }
}
