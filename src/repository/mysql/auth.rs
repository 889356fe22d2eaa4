use async_trait::async_trait;
use sqlx::{MySql, MySqlPool, QueryBuilder};
use tracing::debug;

use super::user_roles::insert_user_role;
use super::users::{SELECT_USER, insert_user};
use crate::error::{AppError, AppResult};
use crate::model::{
    role::Role,
    user::{NewUser, User},
    user_role::{NewUserRole, UserRole},
};
use crate::repository::AuthRepository;

pub struct MySqlAuthRepository {
    pool: MySqlPool,
}

impl MySqlAuthRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthRepository for MySqlAuthRepository {
    async fn find_active_by_username(&self, username: &str) -> AppResult<Option<User>> {
        debug!(username, "Fetching active user by username");
        sqlx::query_as::<_, User>(&format!(
            "{SELECT_USER} WHERE username = ? AND is_active = TRUE"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::database("GetUserByUsername"))
    }

    async fn username_exists(&self, username: &str) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
            .bind(username)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::database("CheckUsernameExists"))?;
        Ok(count > 0)
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE email = ?")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::database("CheckEmailExists"))?;
        Ok(count > 0)
    }

    async fn create_user(&self, new: NewUser) -> AppResult<User> {
        insert_user(&self.pool, &new).await
    }

    async fn roles_by_names(&self, names: &[String]) -> AppResult<Vec<Role>> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        debug!(roles = ?names, "Resolving roles by name");

        let mut builder = QueryBuilder::<MySql>::new(
            "SELECT id, name, is_active, created_on, created_by, updated_on, updated_by \
             FROM roles WHERE name IN (",
        );
        {
            let mut list = builder.separated(", ");
            for name in names {
                list.push_bind(name.as_str());
            }
            list.push_unseparated(")");
        }

        builder
            .build_query_as::<Role>()
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::database("GetRolesByNames"))
    }

    async fn add_user_role(&self, new: NewUserRole) -> AppResult<UserRole> {
        insert_user_role(&self.pool, &new).await
    }

    async fn active_role_names(&self, user_id: u64) -> AppResult<Vec<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT r.name
            FROM user_roles ur
            JOIN roles r ON r.id = ur.role_id
            WHERE ur.user_id = ? AND ur.is_active = TRUE
            ORDER BY ur.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::database("GetUserRoleNames"))
    }
}
