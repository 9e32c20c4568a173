use crate::domain::entities::{NewUser, User, UserStatus};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::user_repository::UserRepository;
use crate::infrastructure::persistence::{inserted_id, Database};
use crate::shared::utils::now_rfc3339;
use async_trait::async_trait;
use sqlx::{any::AnyRow, Row};

const USER_COLUMNS: &str = "SELECT u.id, u.login_id, u.password_hash, u.name, u.email, u.status,
            u.role_id, r.name AS role_name, u.created_at, u.updated_at
     FROM users u
     JOIN roles r ON r.id = u.role_id";

fn row_to_user(row: &AnyRow) -> DomainResult<User> {
    let status: String = row.try_get("status")?;
    Ok(User {
        id: row.try_get("id")?,
        login_id: row.try_get("login_id")?,
        password_hash: row.try_get("password_hash")?,
        name: row.try_get("name")?,
        email: row.try_get("email")?,
        status: status.parse().map_err(DomainError::Internal)?,
        role_id: row.try_get("role_id")?,
        role_name: row.try_get("role_name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl UserRepository for Database {
    async fn create_user(&self, user: &NewUser) -> DomainResult<i64> {
        let now = now_rfc3339();
        let result = sqlx::query(
            "INSERT INTO users
                (login_id, password_hash, name, email, status, role_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.login_id)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.status.as_str())
        .bind(user.role_id)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        inserted_id(&result)
    }

    async fn get_user_by_id(&self, id: i64) -> DomainResult<Option<User>> {
        let row = sqlx::query(&format!("{} WHERE u.id = ?", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn get_user_by_login_id(&self, login_id: &str) -> DomainResult<Option<User>> {
        let row = sqlx::query(&format!("{} WHERE u.login_id = ?", USER_COLUMNS))
            .bind(login_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn login_id_or_email_taken(&self, login_id: &str, email: &str) -> DomainResult<bool> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS count FROM users WHERE login_id = ? OR email = ?",
        )
        .bind(login_id)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        let count: i64 = row.try_get("count")?;
        Ok(count > 0)
    }

    async fn list_users_by_status(&self, status: UserStatus) -> DomainResult<Vec<User>> {
        let rows = sqlx::query(&format!(
            "{} WHERE u.status = ? ORDER BY u.created_at DESC, u.id DESC",
            USER_COLUMNS
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_user).collect()
    }

    async fn list_users_excluding_role(&self, excluded_role_id: i64) -> DomainResult<Vec<User>> {
        let rows = sqlx::query(&format!(
            "{} WHERE u.role_id != ? ORDER BY u.created_at DESC, u.id DESC",
            USER_COLUMNS
        ))
        .bind(excluded_role_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_user).collect()
    }

    async fn update_user_status_and_role(
        &self,
        id: i64,
        status: Option<UserStatus>,
        role_id: Option<i64>,
    ) -> DomainResult<()> {
        let mut builder = sqlx::QueryBuilder::new("UPDATE users SET ");
        let mut separated = builder.separated(", ");

        if let Some(s) = status {
            separated.push("status = ");
            separated.push_bind_unseparated(s.as_str());
        }

        if let Some(r) = role_id {
            separated.push("role_id = ");
            separated.push_bind_unseparated(r);
        }

        separated.push("updated_at = ");
        separated.push_bind_unseparated(now_rfc3339());

        builder.push(" WHERE id = ");
        builder.push_bind(id);

        let result = builder.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("User not found".to_string()));
        }

        Ok(())
    }

    async fn update_password_hash(&self, id: i64, password_hash: &str) -> DomainResult<()> {
        let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(now_rfc3339())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("User not found".to_string()));
        }

        Ok(())
    }

    async fn delete_user(&self, id: i64) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("User not found".to_string()));
        }

        Ok(())
    }
}
