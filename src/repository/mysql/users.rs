use async_trait::async_trait;
use sqlx::MySqlPool;
use tracing::{debug, warn};

use super::is_duplicate_key;
use crate::error::{AppError, AppResult};
use crate::model::user::{NewUser, User, UserPatch};
use crate::repository::CrudRepository;

pub(super) const SELECT_USER: &str = r#"
    SELECT id, username, email, password_hash, password_salt, is_active,
           created_on, created_by, updated_on, updated_by
    FROM users
"#;

pub struct MySqlUsers {
    pool: MySqlPool,
}

impl MySqlUsers {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

pub(super) async fn fetch_user(pool: &MySqlPool, id: u64) -> AppResult<Option<User>> {
    sqlx::query_as::<_, User>(&format!("{SELECT_USER} WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::database("GetUserById"))
}

/// Unique key violations on `users` become `Duplicate`, naming the column
/// that clashed.
fn user_write_error(
    operation: &'static str,
    username: &str,
    email: &str,
) -> impl FnOnce(sqlx::Error) -> AppError {
    move |err| {
        if is_duplicate_key(&err) {
            warn!(operation, "Unique key violation on users");
            let on_email = err
                .as_database_error()
                .is_some_and(|db_err| db_err.message().contains("uq_users_email"));
            if on_email {
                AppError::duplicate("User", "EmailID", email)
            } else {
                AppError::duplicate("User", "UserName", username)
            }
        } else {
            AppError::database(operation)(err)
        }
    }
}

pub(super) async fn insert_user(pool: &MySqlPool, new: &NewUser) -> AppResult<User> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (username, email, password_hash, password_salt, is_active, created_by)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&new.username)
    .bind(&new.email)
    .bind(&new.password_hash)
    .bind(&new.password_salt)
    .bind(new.is_active)
    .bind(new.created_by)
    .execute(pool)
    .await
    .map_err(user_write_error("AddUser", &new.username, &new.email))?;

    let id = result.last_insert_id();
    debug!(id, "User created");

    fetch_user(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))
}

#[async_trait]
impl CrudRepository<User, NewUser, UserPatch> for MySqlUsers {
    async fn list_all(&self) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>(&format!("{SELECT_USER} ORDER BY id"))
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::database("GetAllUsers"))
    }

    async fn get_by_id(&self, id: u64) -> AppResult<Option<User>> {
        debug!(id, "Fetching user");
        fetch_user(&self.pool, id).await
    }

    async fn create(&self, new: NewUser) -> AppResult<User> {
        insert_user(&self.pool, &new).await
    }

    async fn update(&self, id: u64, patch: UserPatch) -> AppResult<Option<User>> {
        if fetch_user(&self.pool, id).await?.is_none() {
            return Ok(None);
        }

        sqlx::query(
            r#"
            UPDATE users
            SET username = ?, email = ?, updated_on = NOW(), updated_by = ?
            WHERE id = ?
            "#,
        )
        .bind(&patch.username)
        .bind(&patch.email)
        .bind(patch.updated_by)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(user_write_error("UpdateUser", &patch.username, &patch.email))?;

        debug!(id, "User updated");
        fetch_user(&self.pool, id).await
    }

    async fn delete(&self, id: u64) -> AppResult<Option<User>> {
        let Some(user) = fetch_user(&self.pool, id).await? else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::database("DeleteUser"))?;

        debug!(id, "User deleted");
        Ok(Some(user))
    }
}
