use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::model::department::{Department, DepartmentPatch, NewDepartment};
use crate::repository::CrudRepository;

pub struct MySqlDepartments {
    pool: MySqlPool,
}

impl MySqlDepartments {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CrudRepository<Department, NewDepartment, DepartmentPatch> for MySqlDepartments {
    async fn list_all(&self) -> AppResult<Vec<Department>> {
        sqlx::query_as::<_, Department>("SELECT id, name, is_active FROM departments ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::database("GetAllDepartments"))
    }

    async fn get_by_id(&self, id: u64) -> AppResult<Option<Department>> {
        debug!(id, "Fetching department");
        sqlx::query_as::<_, Department>("SELECT id, name, is_active FROM departments WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::database("GetDepartmentById"))
    }

    async fn create(&self, new: NewDepartment) -> AppResult<Department> {
        let result = sqlx::query("INSERT INTO departments (name, is_active) VALUES (?, ?)")
            .bind(&new.name)
            .bind(new.is_active)
            .execute(&self.pool)
            .await
            .map_err(AppError::database("AddDepartment"))?;

        let id = result.last_insert_id();
        debug!(id, "Department created");

        Ok(Department {
            id,
            name: new.name,
            is_active: new.is_active,
        })
    }

    async fn update(&self, id: u64, patch: DepartmentPatch) -> AppResult<Option<Department>> {
        let Some(mut department) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        sqlx::query("UPDATE departments SET name = ? WHERE id = ?")
            .bind(&patch.name)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::database("UpdateDepartment"))?;

        debug!(id, "Department updated");
        department.name = patch.name;
        Ok(Some(department))
    }

    async fn delete(&self, id: u64) -> AppResult<Option<Department>> {
        let Some(department) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM departments WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::database("DeleteDepartment"))?;

        debug!(id, "Department deleted");
        Ok(Some(department))
    }
}
