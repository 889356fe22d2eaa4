use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::model::user_role::{NewUserRole, UserRole, UserRolePatch};
use crate::repository::CrudRepository;

const SELECT_USER_ROLE: &str = r#"
    SELECT id, user_id, role_id, is_active, created_on, created_by, updated_on, updated_by
    FROM user_roles
"#;

pub struct MySqlUserRoles {
    pool: MySqlPool,
}

impl MySqlUserRoles {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

pub(super) async fn fetch_user_role(pool: &MySqlPool, id: u64) -> AppResult<Option<UserRole>> {
    sqlx::query_as::<_, UserRole>(&format!("{SELECT_USER_ROLE} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::database("GetUserRoleById"))
}

pub(super) async fn insert_user_role(pool: &MySqlPool, new: &NewUserRole) -> AppResult<UserRole> {
    let result = sqlx::query(
        "INSERT INTO user_roles (user_id, role_id, is_active, created_by) VALUES (?, ?, ?, ?)",
    )
    .bind(new.user_id)
    .bind(new.role_id)
    .bind(new.is_active)
    .bind(new.created_by)
    .execute(pool)
    .await
    .map_err(AppError::database("AddUserRole"))?;

    let id = result.last_insert_id();
    debug!(id, user_id = new.user_id, role_id = new.role_id, "User role created");

    fetch_user_role(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("UserRole", id))
}

#[async_trait]
impl CrudRepository<UserRole, NewUserRole, UserRolePatch> for MySqlUserRoles {
    async fn list_all(&self) -> AppResult<Vec<UserRole>> {
        sqlx::query_as::<_, UserRole>(&format!("{SELECT_USER_ROLE} ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::database("GetAllUserRoles"))
    }

    async fn get_by_id(&self, id: u64) -> AppResult<Option<UserRole>> {
        debug!(id, "Fetching user role");
        fetch_user_role(&self.pool, id).await
    }

    async fn create(&self, new: NewUserRole) -> AppResult<UserRole> {
        insert_user_role(&self.pool, &new).await
    }

    async fn update(&self, id: u64, patch: UserRolePatch) -> AppResult<Option<UserRole>> {
        if fetch_user_role(&self.pool, id).await?.is_none() {
            return Ok(None);
        }

        sqlx::query(
            r#"
            UPDATE user_roles
            SET user_id = ?, role_id = ?, is_active = ?, updated_on = NOW(), updated_by = ?
            WHERE id = ?
            "#,
        )
        .bind(patch.user_id)
        .bind(patch.role_id)
        .bind(patch.is_active)
        .bind(patch.updated_by)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(AppError::database("UpdateUserRole"))?;

        debug!(id, "User role updated");
        fetch_user_role(&self.pool, id).await
    }

    async fn delete(&self, id: u64) -> AppResult<Option<UserRole>> {
        let Some(user_role) = fetch_user_role(&self.pool, id).await? else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM user_roles WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::database("DeleteUserRole"))?;

        debug!(id, "User role deleted");
        Ok(Some(user_role))
    }
}
