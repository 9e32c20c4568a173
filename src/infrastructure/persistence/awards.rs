use crate::domain::entities::Award;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::award_repository::AwardRepository;
use crate::infrastructure::persistence::{inserted_id, optional_text, Database};
use crate::shared::utils::now_rfc3339;
use async_trait::async_trait;
use sqlx::{any::AnyRow, Row};

fn row_to_award(row: &AnyRow) -> DomainResult<Award> {
    Ok(Award {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        description: optional_text(row, "description"),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl AwardRepository for Database {
    async fn list_awards(&self, user_id: Option<i64>) -> DomainResult<Vec<Award>> {
        let mut builder = sqlx::QueryBuilder::new(
            "SELECT id, user_id, title, description, created_at, updated_at FROM awards",
        );
        if let Some(user_id) = user_id {
            builder.push(" WHERE user_id = ");
            builder.push_bind(user_id);
        }
        builder.push(" ORDER BY created_at DESC, id DESC");

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(row_to_award).collect()
    }

    async fn get_award(&self, id: i64) -> DomainResult<Option<Award>> {
        let row = sqlx::query(
            "SELECT id, user_id, title, description, created_at, updated_at
             FROM awards WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_award).transpose()
    }

    async fn create_award(
        &self,
        user_id: i64,
        title: &str,
        description: Option<&str>,
    ) -> DomainResult<i64> {
        let now = now_rfc3339();
        let result = sqlx::query(
            "INSERT INTO awards (user_id, title, description, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(title)
        .bind(description)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        inserted_id(&result)
    }

    async fn update_award(
        &self,
        id: i64,
        title: Option<&str>,
        description: Option<&str>,
    ) -> DomainResult<()> {
        let mut builder = sqlx::QueryBuilder::new("UPDATE awards SET ");
        let mut separated = builder.separated(", ");

        if let Some(t) = title {
            separated.push("title = ");
            separated.push_bind_unseparated(t);
        }

        if let Some(d) = description {
            separated.push("description = ");
            separated.push_bind_unseparated(d);
        }

        separated.push("updated_at = ");
        separated.push_bind_unseparated(now_rfc3339());

        builder.push(" WHERE id = ");
        builder.push_bind(id);

        let result = builder.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("Award not found".to_string()));
        }

        Ok(())
    }

    async fn delete_award(&self, id: i64) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM awards WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("Award not found".to_string()));
        }

        Ok(())
    }
}
