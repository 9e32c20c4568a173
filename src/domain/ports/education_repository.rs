use crate::domain::entities::Education;
use crate::domain::errors::DomainResult;
use async_trait::async_trait;

#[async_trait]
pub trait EducationRepository: Send + Sync {
    async fn list_education(&self, user_id: Option<i64>) -> DomainResult<Vec<Education>>;
    async fn get_education(&self, id: i64) -> DomainResult<Option<Education>>;
    async fn create_education(
        &self,
        user_id: i64,
        title: &str,
        description: Option<&str>,
    ) -> DomainResult<i64>;
    async fn update_education(
        &self,
        id: i64,
        title: Option<&str>,
        description: Option<&str>,
    ) -> DomainResult<()>;
    async fn delete_education(&self, id: i64) -> DomainResult<()>;
}
