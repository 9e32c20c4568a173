use crate::application::services::PermissionService;
use crate::domain::entities::{
    Category, Comment, CommentRequest, CreateCategoryRequest, CreatePostRequest, Post,
    UpdatePostRequest,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::permissions::Action;
use crate::domain::ports::post_repository::PostRepository;
use crate::shared::utils::validate_text;
use std::sync::Arc;

const TITLE_MAX: usize = 200;
const CONTENT_MAX: usize = 10_000;
const COMMENT_MAX: usize = 1_000;

/// Board categories, posts and comments. Mutations follow
/// ownership-or-override: authors may always edit their own content.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    permissions: PermissionService,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, permissions: PermissionService) -> Self {
        Self { posts, permissions }
    }

    pub async fn list_categories(&self, actor_id: i64) -> DomainResult<Vec<Category>> {
        self.permissions
            .require_permission(actor_id, Action::ViewCategories)
            .await?;
        self.posts.list_categories().await
    }

    pub async fn create_category(
        &self,
        actor_id: i64,
        request: CreateCategoryRequest,
    ) -> DomainResult<Category> {
        self.permissions
            .require_permission(actor_id, Action::CreateCategory)
            .await?;

        let name = validate_text("Category name", &request.name, 1, 50)?;
        if self.posts.get_category_by_name(&name).await?.is_some() {
            return Err(DomainError::Conflict(format!(
                "Category '{}' already exists",
                name
            )));
        }

        let id = self
            .posts
            .create_category(&name, request.description.as_deref())
            .await?;
        self.posts
            .get_category(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Category not found".to_string()))
    }

    pub async fn list_posts(
        &self,
        actor_id: i64,
        category_id: Option<i64>,
    ) -> DomainResult<Vec<Post>> {
        self.permissions
            .require_permission(actor_id, Action::ViewPosts)
            .await?;
        self.posts.list_posts(category_id).await
    }

    pub async fn get_post(&self, actor_id: i64, id: i64) -> DomainResult<Post> {
        self.permissions
            .require_permission(actor_id, Action::ViewPosts)
            .await?;
        self.find_post(id).await
    }

    pub async fn create_post(
        &self,
        actor_id: i64,
        request: CreatePostRequest,
    ) -> DomainResult<Post> {
        self.permissions
            .require_permission(actor_id, Action::CreatePost)
            .await?;

        let title = validate_text("Title", &request.title, 1, TITLE_MAX)?;
        let content = validate_text("Content", &request.content, 1, CONTENT_MAX)?;
        self.ensure_category(request.category_id).await?;

        let id = self
            .posts
            .create_post(actor_id, request.category_id, &title, &content)
            .await?;
        self.find_post(id).await
    }

    pub async fn update_post(
        &self,
        actor_id: i64,
        id: i64,
        request: UpdatePostRequest,
    ) -> DomainResult<Post> {
        let post = self.find_post(id).await?;
        self.permissions
            .require_modify(actor_id, post.author_id, Action::EditAnyPost)
            .await?;

        let title = request
            .title
            .as_deref()
            .map(|t| validate_text("Title", t, 1, TITLE_MAX))
            .transpose()?;
        let content = request
            .content
            .as_deref()
            .map(|c| validate_text("Content", c, 1, CONTENT_MAX))
            .transpose()?;
        if let Some(category_id) = request.category_id {
            self.ensure_category(category_id).await?;
        }

        self.posts
            .update_post(id, title.as_deref(), content.as_deref(), request.category_id)
            .await?;
        self.find_post(id).await
    }

    pub async fn delete_post(&self, actor_id: i64, id: i64) -> DomainResult<()> {
        let post = self.find_post(id).await?;
        self.permissions
            .require_modify(actor_id, post.author_id, Action::DeleteAnyPost)
            .await?;

        self.posts.delete_post(id).await?;
        if actor_id != post.author_id {
            tracing::info!("User {} deleted post {} of user {}", actor_id, id, post.author_id);
        }
        Ok(())
    }

    pub async fn list_comments(&self, actor_id: i64, post_id: i64) -> DomainResult<Vec<Comment>> {
        self.permissions
            .require_permission(actor_id, Action::ViewComments)
            .await?;
        self.find_post(post_id).await?;
        self.posts.list_comments(post_id).await
    }

    pub async fn create_comment(
        &self,
        actor_id: i64,
        post_id: i64,
        request: CommentRequest,
    ) -> DomainResult<Comment> {
        self.permissions
            .require_permission(actor_id, Action::CreateComment)
            .await?;

        let content = validate_text("Comment", &request.content, 1, COMMENT_MAX)?;
        self.find_post(post_id).await?;

        let id = self.posts.create_comment(post_id, actor_id, &content).await?;
        self.find_comment(post_id, id).await
    }

    pub async fn update_comment(
        &self,
        actor_id: i64,
        post_id: i64,
        comment_id: i64,
        request: CommentRequest,
    ) -> DomainResult<Comment> {
        let comment = self.find_comment(post_id, comment_id).await?;
        self.permissions
            .require_modify(actor_id, comment.author_id, Action::EditAnyComment)
            .await?;

        let content = validate_text("Comment", &request.content, 1, COMMENT_MAX)?;
        self.posts.update_comment(comment_id, &content).await?;
        self.find_comment(post_id, comment_id).await
    }

    pub async fn delete_comment(
        &self,
        actor_id: i64,
        post_id: i64,
        comment_id: i64,
    ) -> DomainResult<()> {
        let comment = self.find_comment(post_id, comment_id).await?;
        self.permissions
            .require_modify(actor_id, comment.author_id, Action::DeleteAnyComment)
            .await?;

        self.posts.delete_comment(comment_id).await
    }

    async fn find_post(&self, id: i64) -> DomainResult<Post> {
        self.posts
            .get_post(id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Post not found".to_string()))
    }

    /// A comment reached through a post it does not belong to is rejected.
    async fn find_comment(&self, post_id: i64, comment_id: i64) -> DomainResult<Comment> {
        let comment = self
            .posts
            .get_comment(comment_id)
            .await?
            .ok_or_else(|| DomainError::NotFound("Comment not found".to_string()))?;

        if comment.post_id != post_id {
            return Err(DomainError::ValidationError(
                "Comment does not belong to this post".to_string(),
            ));
        }

        Ok(comment)
    }

    async fn ensure_category(&self, id: i64) -> DomainResult<()> {
        match self.posts.get_category(id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::ValidationError(
                "Category does not exist".to_string(),
            )),
        }
    }
}
