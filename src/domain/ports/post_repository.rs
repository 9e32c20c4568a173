use crate::domain::entities::{Category, Comment, Post};
use crate::domain::errors::DomainResult;
use async_trait::async_trait;

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn list_categories(&self) -> DomainResult<Vec<Category>>;
    async fn get_category(&self, id: i64) -> DomainResult<Option<Category>>;
    async fn get_category_by_name(&self, name: &str) -> DomainResult<Option<Category>>;
    async fn create_category(&self, name: &str, description: Option<&str>) -> DomainResult<i64>;

    async fn list_posts(&self, category_id: Option<i64>) -> DomainResult<Vec<Post>>;
    async fn get_post(&self, id: i64) -> DomainResult<Option<Post>>;
    async fn create_post(
        &self,
        author_id: i64,
        category_id: i64,
        title: &str,
        content: &str,
    ) -> DomainResult<i64>;
    async fn update_post(
        &self,
        id: i64,
        title: Option<&str>,
        content: Option<&str>,
        category_id: Option<i64>,
    ) -> DomainResult<()>;
    async fn delete_post(&self, id: i64) -> DomainResult<()>;

    async fn list_comments(&self, post_id: i64) -> DomainResult<Vec<Comment>>;
    async fn get_comment(&self, id: i64) -> DomainResult<Option<Comment>>;
    async fn create_comment(&self, post_id: i64, author_id: i64, content: &str)
        -> DomainResult<i64>;
    async fn update_comment(&self, id: i64, content: &str) -> DomainResult<()>;
    async fn delete_comment(&self, id: i64) -> DomainResult<()>;
}
