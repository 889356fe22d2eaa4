use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::model::employee::{Employee, EmployeePatch, NewEmployee, professional_email};
use crate::repository::CrudRepository;

const SELECT_EMPLOYEE: &str = r#"
    SELECT id, first_name, last_name, contact_no, date_of_birth, department_id, role_id,
           hire_date, salary, manager_id, is_active, user_id
    FROM employees
"#;

pub struct MySqlEmployees {
    pool: MySqlPool,
    email_domain: String,
}

impl MySqlEmployees {
    pub fn new(pool: MySqlPool, email_domain: impl Into<String>) -> Self {
        Self {
            pool,
            email_domain: email_domain.into(),
        }
    }
}

#[async_trait]
impl CrudRepository<Employee, NewEmployee, EmployeePatch> for MySqlEmployees {
    async fn list_all(&self) -> AppResult<Vec<Employee>> {
        sqlx::query_as::<_, Employee>(&format!("{SELECT_EMPLOYEE} ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::database("GetAllEmployees"))
    }

    async fn get_by_id(&self, id: u64) -> AppResult<Option<Employee>> {
        debug!(id, "Fetching employee");
        sqlx::query_as::<_, Employee>(&format!("{SELECT_EMPLOYEE} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::database("GetEmployeeById"))
    }

    /// Inserts the employee and, when it is linked to a user, switches that
    /// user's email to the professional address in the same transaction.
    async fn create(&self, new: NewEmployee) -> AppResult<Employee> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(AppError::database("AddEmployee"))?;

        let result = sqlx::query(
            r#"
            INSERT INTO employees
            (first_name, last_name, contact_no, date_of_birth, department_id, role_id,
             hire_date, salary, manager_id, is_active, user_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.contact_no)
        .bind(new.date_of_birth)
        .bind(new.department_id)
        .bind(new.role_id)
        .bind(new.hire_date)
        .bind(new.salary)
        .bind(new.manager_id)
        .bind(new.is_active)
        .bind(new.user_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::database("AddEmployee"))?;

        let id = result.last_insert_id();

        if let Some(user_id) = new.user_id.filter(|&uid| uid > 0) {
            let email = professional_email(&new.first_name, &new.last_name, &self.email_domain);
            sqlx::query("UPDATE users SET email = ?, updated_on = NOW() WHERE id = ?")
                .bind(&email)
                .bind(user_id)
                .execute(&mut *tx)
                .await
                .map_err(AppError::database("UpdateUserEmailOnEmployeeConversion"))?;
            info!(user_id, employee_id = id, "User converted to employee");
        }

        tx.commit()
            .await
            .map_err(AppError::database("AddEmployee"))?;

        debug!(id, "Employee created");
        Ok(Employee {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            contact_no: new.contact_no,
            date_of_birth: new.date_of_birth,
            department_id: new.department_id,
            role_id: new.role_id,
            hire_date: new.hire_date,
            salary: new.salary,
            manager_id: new.manager_id,
            is_active: new.is_active,
            user_id: new.user_id,
        })
    }

    async fn update(&self, id: u64, patch: EmployeePatch) -> AppResult<Option<Employee>> {
        if self.get_by_id(id).await?.is_none() {
            return Ok(None);
        }

        sqlx::query(
            r#"
            UPDATE employees
            SET first_name = ?, last_name = ?, department_id = ?, role_id = ?, is_active = ?
            WHERE id = ?
            "#,
        )
        .bind(&patch.first_name)
        .bind(&patch.last_name)
        .bind(patch.department_id)
        .bind(patch.role_id)
        .bind(patch.is_active)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(AppError::database("UpdateEmployee"))?;

        debug!(id, "Employee updated");
        self.get_by_id(id).await
    }

    async fn delete(&self, id: u64) -> AppResult<Option<Employee>> {
        let Some(employee) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM employees WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::database("DeleteEmployee"))?;

        debug!(id, "Employee deleted");
        Ok(Some(employee))
    }
}
