use crate::domain::entities::{NewUser, User, UserStatus};
use crate::domain::errors::DomainResult;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(&self, user: &NewUser) -> DomainResult<i64>;
    async fn get_user_by_id(&self, id: i64) -> DomainResult<Option<User>>;
    async fn get_user_by_login_id(&self, login_id: &str) -> DomainResult<Option<User>>;
    async fn login_id_or_email_taken(&self, login_id: &str, email: &str) -> DomainResult<bool>;
    async fn list_users_by_status(&self, status: UserStatus) -> DomainResult<Vec<User>>;
    /// Every user whose role is not `excluded_role_id`.
    async fn list_users_excluding_role(&self, excluded_role_id: i64) -> DomainResult<Vec<User>>;
    async fn update_user_status_and_role(
        &self,
        id: i64,
        status: Option<UserStatus>,
        role_id: Option<i64>,
    ) -> DomainResult<()>;
    async fn update_password_hash(&self, id: i64, password_hash: &str) -> DomainResult<()>;
    async fn delete_user(&self, id: i64) -> DomainResult<()>;
}
