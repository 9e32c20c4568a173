use crate::domain::entities::Award;
use crate::domain::errors::DomainResult;
use async_trait::async_trait;

#[async_trait]
pub trait AwardRepository: Send + Sync {
    async fn list_awards(&self, user_id: Option<i64>) -> DomainResult<Vec<Award>>;
    async fn get_award(&self, id: i64) -> DomainResult<Option<Award>>;
    async fn create_award(
        &self,
        user_id: i64,
        title: &str,
        description: Option<&str>,
    ) -> DomainResult<i64>;
    async fn update_award(
        &self,
        id: i64,
        title: Option<&str>,
        description: Option<&str>,
    ) -> DomainResult<()>;
    async fn delete_award(&self, id: i64) -> DomainResult<()>;
}
