use crate::domain::entities::{Permission, Role};
use crate::domain::errors::DomainResult;
use async_trait::async_trait;

#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn list_roles(&self) -> DomainResult<Vec<Role>>;
    async fn get_role_by_id(&self, id: i64) -> DomainResult<Option<Role>>;
    async fn get_role_by_name(&self, name: &str) -> DomainResult<Option<Role>>;
    async fn create_role(
        &self,
        name: &str,
        description: Option<&str>,
        permission_ids: &[i64],
    ) -> DomainResult<i64>;
    /// Applies the optional field changes and, when `permission_ids` is
    /// given, replaces the role's whole grant set. All in one transaction.
    async fn update_role(
        &self,
        id: i64,
        name: Option<&str>,
        description: Option<&str>,
        permission_ids: Option<&[i64]>,
    ) -> DomainResult<()>;
    async fn delete_role(&self, id: i64) -> DomainResult<()>;
    async fn count_users_with_role(&self, role_id: i64) -> DomainResult<i64>;

    /// Source user goes back to `fallback_role_id`, target user gets `role_id`.
    async fn transfer_role(
        &self,
        from_user_id: i64,
        to_user_id: i64,
        role_id: i64,
        fallback_role_id: i64,
    ) -> DomainResult<()>;

    async fn list_permissions(&self) -> DomainResult<Vec<Permission>>;
    async fn find_permissions_by_ids(&self, ids: &[i64]) -> DomainResult<Vec<Permission>>;
}
