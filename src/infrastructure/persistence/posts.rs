use crate::domain::entities::{Category, Comment, Post};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::post_repository::PostRepository;
use crate::infrastructure::persistence::{inserted_id, optional_text, Database};
use crate::shared::utils::now_rfc3339;
use async_trait::async_trait;
use sqlx::{any::AnyRow, Row};

fn row_to_category(row: &AnyRow) -> DomainResult<Category> {
    Ok(Category {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: optional_text(row, "description"),
    })
}

fn row_to_post(row: &AnyRow) -> DomainResult<Post> {
    Ok(Post {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        category_id: row.try_get("category_id")?,
        author_id: row.try_get("author_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_comment(row: &AnyRow) -> DomainResult<Comment> {
    Ok(Comment {
        id: row.try_get("id")?,
        post_id: row.try_get("post_id")?,
        author_id: row.try_get("author_id")?,
        content: row.try_get("content")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl PostRepository for Database {
    async fn list_categories(&self) -> DomainResult<Vec<Category>> {
        let rows = sqlx::query("SELECT id, name, description FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_category).collect()
    }

    async fn get_category(&self, id: i64) -> DomainResult<Option<Category>> {
        let row = sqlx::query("SELECT id, name, description FROM categories WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_category).transpose()
    }

    async fn get_category_by_name(&self, name: &str) -> DomainResult<Option<Category>> {
        let row = sqlx::query("SELECT id, name, description FROM categories WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_category).transpose()
    }

    async fn create_category(&self, name: &str, description: Option<&str>) -> DomainResult<i64> {
        let result = sqlx::query(
            "INSERT INTO categories (name, description, created_at) VALUES (?, ?, ?)",
        )
        .bind(name)
        .bind(description)
        .bind(now_rfc3339())
        .execute(&self.pool)
        .await?;

        inserted_id(&result)
    }

    async fn list_posts(&self, category_id: Option<i64>) -> DomainResult<Vec<Post>> {
        let mut builder = sqlx::QueryBuilder::new(
            "SELECT id, title, content, category_id, author_id, created_at, updated_at FROM posts",
        );
        if let Some(category_id) = category_id {
            builder.push(" WHERE category_id = ");
            builder.push_bind(category_id);
        }
        builder.push(" ORDER BY created_at DESC, id DESC");

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(row_to_post).collect()
    }

    async fn get_post(&self, id: i64) -> DomainResult<Option<Post>> {
        let row = sqlx::query(
            "SELECT id, title, content, category_id, author_id, created_at, updated_at
             FROM posts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_post).transpose()
    }

    async fn create_post(
        &self,
        author_id: i64,
        category_id: i64,
        title: &str,
        content: &str,
    ) -> DomainResult<i64> {
        let now = now_rfc3339();
        let result = sqlx::query(
            "INSERT INTO posts (title, content, category_id, author_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(title)
        .bind(content)
        .bind(category_id)
        .bind(author_id)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        inserted_id(&result)
    }

    async fn update_post(
        &self,
        id: i64,
        title: Option<&str>,
        content: Option<&str>,
        category_id: Option<i64>,
    ) -> DomainResult<()> {
        let mut builder = sqlx::QueryBuilder::new("UPDATE posts SET ");
        let mut separated = builder.separated(", ");

        if let Some(t) = title {
            separated.push("title = ");
            separated.push_bind_unseparated(t);
        }

        if let Some(c) = content {
            separated.push("content = ");
            separated.push_bind_unseparated(c);
        }

        if let Some(c) = category_id {
            separated.push("category_id = ");
            separated.push_bind_unseparated(c);
        }

        separated.push("updated_at = ");
        separated.push_bind_unseparated(now_rfc3339());

        builder.push(" WHERE id = ");
        builder.push_bind(id);

        let result = builder.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("Post not found".to_string()));
        }

        Ok(())
    }

    async fn delete_post(&self, id: i64) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("Post not found".to_string()));
        }

        Ok(())
    }

    async fn list_comments(&self, post_id: i64) -> DomainResult<Vec<Comment>> {
        let rows = sqlx::query(
            "SELECT id, post_id, author_id, content, created_at, updated_at
             FROM comments WHERE post_id = ?
             ORDER BY created_at ASC, id ASC",
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_comment).collect()
    }

    async fn get_comment(&self, id: i64) -> DomainResult<Option<Comment>> {
        let row = sqlx::query(
            "SELECT id, post_id, author_id, content, created_at, updated_at
             FROM comments WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_comment).transpose()
    }

    async fn create_comment(
        &self,
        post_id: i64,
        author_id: i64,
        content: &str,
    ) -> DomainResult<i64> {
        let now = now_rfc3339();
        let result = sqlx::query(
            "INSERT INTO comments (post_id, author_id, content, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(post_id)
        .bind(author_id)
        .bind(content)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        inserted_id(&result)
    }

    async fn update_comment(&self, id: i64, content: &str) -> DomainResult<()> {
        let result = sqlx::query("UPDATE comments SET content = ?, updated_at = ? WHERE id = ?")
            .bind(content)
            .bind(now_rfc3339())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("Comment not found".to_string()));
        }

        Ok(())
    }

    async fn delete_comment(&self, id: i64) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("Comment not found".to_string()));
        }

        Ok(())
    }
}
