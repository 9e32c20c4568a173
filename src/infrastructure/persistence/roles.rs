use crate::domain::entities::{Permission, Role, RoleGrants};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::permissions::Action;
use crate::domain::ports::permission_store::PermissionStore;
use crate::domain::ports::role_repository::RoleRepository;
use crate::infrastructure::persistence::{inserted_id, optional_text, Database};
use crate::shared::utils::now_rfc3339;
use async_trait::async_trait;
use sqlx::{any::AnyRow, Row};
use std::collections::{BTreeSet, HashMap};

const ROLE_COLUMNS: &str = "SELECT r.id, r.name, r.description, r.created_at, r.updated_at,
            (SELECT COUNT(*) FROM users u WHERE u.role_id = r.id) AS user_count
     FROM roles r";

fn row_to_role(row: &AnyRow, permissions: Vec<Permission>) -> DomainResult<Role> {
    Ok(Role {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        description: optional_text(row, "description"),
        permissions,
        user_count: row.try_get("user_count")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_permission(row: &AnyRow) -> DomainResult<Permission> {
    Ok(Permission {
        id: row.try_get("id")?,
        action: row.try_get("action")?,
        description: optional_text(row, "description"),
    })
}

// Catalog seeding and grant lookups shared by the trait impls
impl Database {
    async fn permissions_for_role(&self, role_id: i64) -> DomainResult<Vec<Permission>> {
        let rows = sqlx::query(
            "SELECT p.id, p.action, p.description
             FROM role_permissions rp
             JOIN permissions p ON p.id = rp.permission_id
             WHERE rp.role_id = ?
             ORDER BY p.id",
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_permission).collect()
    }

    async fn fetch_role(&self, query: &str, bind: RoleKey<'_>) -> DomainResult<Option<Role>> {
        let q = sqlx::query(query);
        let q = match bind {
            RoleKey::Id(id) => q.bind(id),
            RoleKey::Name(name) => q.bind(name),
        };

        match q.fetch_optional(&self.pool).await? {
            Some(row) => {
                let id: i64 = row.try_get("id")?;
                let permissions = self.permissions_for_role(id).await?;
                Ok(Some(row_to_role(&row, permissions)?))
            }
            None => Ok(None),
        }
    }

    /// Inserts the action into the catalog if it is not there yet.
    pub async fn ensure_permission(&self, action: Action) -> DomainResult<()> {
        sqlx::query("INSERT OR IGNORE INTO permissions (action, description) VALUES (?, ?)")
            .bind(action.as_str())
            .bind(action.description())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Returns the role id and whether the row was created by this call.
    pub async fn ensure_role(&self, name: &str, description: &str) -> DomainResult<(i64, bool)> {
        if let Some(row) = sqlx::query("SELECT id FROM roles WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?
        {
            return Ok((row.try_get("id")?, false));
        }

        let id = self.create_role(name, Some(description), &[]).await?;
        Ok((id, true))
    }

    /// Adds grants for the given actions. Existing grants are left alone.
    pub async fn grant_actions(&self, role_id: i64, actions: &[Action]) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;
        for action in actions {
            sqlx::query(
                "INSERT OR IGNORE INTO role_permissions (role_id, permission_id)
                 SELECT ?, id FROM permissions WHERE action = ?",
            )
            .bind(role_id)
            .bind(action.as_str())
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

enum RoleKey<'a> {
    Id(i64),
    Name(&'a str),
}

#[async_trait]
impl PermissionStore for Database {
    async fn find_role_and_permissions_for_user(
        &self,
        user_id: i64,
    ) -> DomainResult<Option<RoleGrants>> {
        // One read transaction so the role and its grants come from the same snapshot.
        let mut tx = self.pool.begin().await?;

        let Some(user) = sqlx::query("SELECT role_id FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };
        let role_id: i64 = user.try_get("role_id")?;

        let rows = sqlx::query(
            "SELECT p.action
             FROM role_permissions rp
             JOIN permissions p ON p.id = rp.permission_id
             WHERE rp.role_id = ?",
        )
        .bind(role_id)
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;

        let actions = rows
            .iter()
            .map(|row| row.try_get::<String, _>("action"))
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(Some(RoleGrants { role_id, actions }))
    }
}

#[async_trait]
impl RoleRepository for Database {
    async fn list_roles(&self) -> DomainResult<Vec<Role>> {
        let rows = sqlx::query(&format!("{} ORDER BY r.id", ROLE_COLUMNS))
            .fetch_all(&self.pool)
            .await?;

        let grant_rows = sqlx::query(
            "SELECT rp.role_id, p.id, p.action, p.description
             FROM role_permissions rp
             JOIN permissions p ON p.id = rp.permission_id
             ORDER BY p.id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut grants: HashMap<i64, Vec<Permission>> = HashMap::new();
        for row in &grant_rows {
            let role_id: i64 = row.try_get("role_id")?;
            grants
                .entry(role_id)
                .or_default()
                .push(row_to_permission(row)?);
        }

        rows.iter()
            .map(|row| {
                let id: i64 = row.try_get("id")?;
                row_to_role(row, grants.remove(&id).unwrap_or_default())
            })
            .collect()
    }

    async fn get_role_by_id(&self, id: i64) -> DomainResult<Option<Role>> {
        self.fetch_role(&format!("{} WHERE r.id = ?", ROLE_COLUMNS), RoleKey::Id(id))
            .await
    }

    async fn get_role_by_name(&self, name: &str) -> DomainResult<Option<Role>> {
        self.fetch_role(
            &format!("{} WHERE r.name = ?", ROLE_COLUMNS),
            RoleKey::Name(name),
        )
        .await
    }

    async fn create_role(
        &self,
        name: &str,
        description: Option<&str>,
        permission_ids: &[i64],
    ) -> DomainResult<i64> {
        let now = now_rfc3339();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO roles (name, description, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(description)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?;
        let id = inserted_id(&result)?;

        for permission_id in permission_ids {
            sqlx::query(
                "INSERT OR IGNORE INTO role_permissions (role_id, permission_id) VALUES (?, ?)",
            )
            .bind(id)
            .bind(*permission_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(id)
    }

    async fn update_role(
        &self,
        id: i64,
        name: Option<&str>,
        description: Option<&str>,
        permission_ids: Option<&[i64]>,
    ) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        let mut builder = sqlx::QueryBuilder::new("UPDATE roles SET ");
        let mut separated = builder.separated(", ");

        if let Some(n) = name {
            separated.push("name = ");
            separated.push_bind_unseparated(n);
        }

        if let Some(d) = description {
            separated.push("description = ");
            separated.push_bind_unseparated(d);
        }

        separated.push("updated_at = ");
        separated.push_bind_unseparated(now_rfc3339());

        builder.push(" WHERE id = ");
        builder.push_bind(id);

        let result = builder.build().execute(&mut *tx).await?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("Role not found".to_string()));
        }

        // Whole-set replacement: readers see either the old grants or the new ones.
        if let Some(permission_ids) = permission_ids {
            sqlx::query("DELETE FROM role_permissions WHERE role_id = ?")
                .bind(id)
                .execute(&mut *tx)
                .await?;

            for permission_id in permission_ids {
                sqlx::query(
                    "INSERT OR IGNORE INTO role_permissions (role_id, permission_id) VALUES (?, ?)",
                )
                .bind(id)
                .bind(*permission_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete_role(&self, id: i64) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM role_permissions WHERE role_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM roles WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound("Role not found".to_string()));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn count_users_with_role(&self, role_id: i64) -> DomainResult<i64> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM users WHERE role_id = ?")
            .bind(role_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("count")?)
    }

    async fn transfer_role(
        &self,
        from_user_id: i64,
        to_user_id: i64,
        role_id: i64,
        fallback_role_id: i64,
    ) -> DomainResult<()> {
        let mut tx = self.pool.begin().await?;

        let from_role: i64 = sqlx::query("SELECT role_id FROM users WHERE id = ?")
            .bind(from_user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DomainError::NotFound("Source user not found".to_string()))?
            .try_get("role_id")?;

        let to_role: i64 = sqlx::query("SELECT role_id FROM users WHERE id = ?")
            .bind(to_user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DomainError::NotFound("Target user not found".to_string()))?
            .try_get("role_id")?;

        sqlx::query("SELECT id FROM roles WHERE id = ?")
            .bind(role_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DomainError::NotFound("Role not found".to_string()))?;

        if from_role != role_id {
            return Err(DomainError::ValidationError(
                "Source user does not have the specified role".to_string(),
            ));
        }

        if to_role != fallback_role_id {
            return Err(DomainError::ValidationError(
                "Target user is not a member".to_string(),
            ));
        }

        let now = now_rfc3339();
        for (user_id, new_role) in [(from_user_id, fallback_role_id), (to_user_id, role_id)] {
            sqlx::query("UPDATE users SET role_id = ?, updated_at = ? WHERE id = ?")
                .bind(new_role)
                .bind(&now)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn list_permissions(&self) -> DomainResult<Vec<Permission>> {
        let rows = sqlx::query("SELECT id, action, description FROM permissions ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_permission).collect()
    }

    async fn find_permissions_by_ids(&self, ids: &[i64]) -> DomainResult<Vec<Permission>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = sqlx::QueryBuilder::new(
            "SELECT id, action, description FROM permissions WHERE id IN (",
        );
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY id");

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(row_to_permission).collect()
    }
}
