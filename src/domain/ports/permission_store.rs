use crate::domain::entities::RoleGrants;
use crate::domain::errors::DomainResult;
use async_trait::async_trait;

/// Read side of the role/permission graph used by authorization checks.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// `Ok(None)` when the user does not exist. Errors mean the store itself
    /// failed and must surface as `StoreUnavailable`.
    async fn find_role_and_permissions_for_user(
        &self,
        user_id: i64,
    ) -> DomainResult<Option<RoleGrants>>;
}
