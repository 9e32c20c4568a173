use crate::domain::entities::Education;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::education_repository::EducationRepository;
use crate::infrastructure::persistence::{inserted_id, optional_text, Database};
use crate::shared::utils::now_rfc3339;
use async_trait::async_trait;
use sqlx::{any::AnyRow, Row};

fn row_to_education(row: &AnyRow) -> DomainResult<Education> {
    Ok(Education {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        description: optional_text(row, "description"),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn not_found() -> DomainError {
    DomainError::NotFound("Education record not found".to_string())
}

#[async_trait]
impl EducationRepository for Database {
    async fn list_education(&self, user_id: Option<i64>) -> DomainResult<Vec<Education>> {
        let mut builder = sqlx::QueryBuilder::new(
            "SELECT id, user_id, title, description, created_at, updated_at FROM education",
        );
        if let Some(user_id) = user_id {
            builder.push(" WHERE user_id = ");
            builder.push_bind(user_id);
        }
        builder.push(" ORDER BY created_at DESC, id DESC");

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(row_to_education).collect()
    }

    async fn get_education(&self, id: i64) -> DomainResult<Option<Education>> {
        let row = sqlx::query(
            "SELECT id, user_id, title, description, created_at, updated_at
             FROM education WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_education).transpose()
    }

    async fn create_education(
        &self,
        user_id: i64,
        title: &str,
        description: Option<&str>,
    ) -> DomainResult<i64> {
        let now = now_rfc3339();
        let result = sqlx::query(
            "INSERT INTO education (user_id, title, description, created_at, updated_at)
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

    async fn update_education(
        &self,
        id: i64,
        title: Option<&str>,
        description: Option<&str>,
    ) -> DomainResult<()> {
        let mut builder = sqlx::QueryBuilder::new("UPDATE education SET ");
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
            return Err(not_found());
        }

        Ok(())
    }

    async fn delete_education(&self, id: i64) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM education WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found());
        }

        Ok(())
    }
}
