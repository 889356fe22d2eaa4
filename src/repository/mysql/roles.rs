use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::model::role::{NewRole, Role, RolePatch};
use crate::repository::CrudRepository;

const SELECT_ROLE: &str = r#"
    SELECT id, name, is_active, created_on, created_by, updated_on, updated_by
    FROM roles
"#;

pub struct MySqlRoles {
    pool: MySqlPool,
}

impl MySqlRoles {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CrudRepository<Role, NewRole, RolePatch> for MySqlRoles {
    async fn list_all(&self) -> AppResult<Vec<Role>> {
        sqlx::query_as::<_, Role>(&format!("{SELECT_ROLE} ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::database("GetAllRoles"))
    }

    async fn get_by_id(&self, id: u64) -> AppResult<Option<Role>> {
        debug!(id, "Fetching role");
        sqlx::query_as::<_, Role>(&format!("{SELECT_ROLE} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::database("GetRoleById"))
    }

    async fn create(&self, new: NewRole) -> AppResult<Role> {
        let result = sqlx::query("INSERT INTO roles (name, is_active, created_by) VALUES (?, ?, ?)")
            .bind(&new.name)
            .bind(new.is_active)
            .bind(new.created_by)
            .execute(&self.pool)
            .await
            .map_err(AppError::database("AddRole"))?;

        let id = result.last_insert_id();
        debug!(id, "Role created");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Role", id))
    }

    async fn update(&self, id: u64, patch: RolePatch) -> AppResult<Option<Role>> {
        if self.get_by_id(id).await?.is_none() {
            return Ok(None);
        }

        sqlx::query("UPDATE roles SET name = ?, updated_on = NOW(), updated_by = ? WHERE id = ?")
            .bind(&patch.name)
            .bind(patch.updated_by)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::database("UpdateRole"))?;

        debug!(id, "Role updated");
        self.get_by_id(id).await
    }

    async fn delete(&self, id: u64) -> AppResult<Option<Role>> {
        let Some(role) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM roles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::database("DeleteRole"))?;

        debug!(id, "Role deleted");
        Ok(Some(role))
    }
}
