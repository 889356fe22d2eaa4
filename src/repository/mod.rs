use async_trait::async_trait;

use crate::error::AppResult;
use crate::model::{
    department::{Department, DepartmentPatch, NewDepartment},
    employee::{Employee, EmployeePatch, NewEmployee},
    role::{NewRole, Role, RolePatch},
    user::{NewUser, User, UserPatch},
    user_role::{NewUserRole, UserRole, UserRolePatch},
};

#[cfg(test)]
pub mod memory;
pub mod mysql;

/// Uniform data access for one entity. `update` and `delete` return `None`
/// when no row has the id.
#[async_trait]
pub trait CrudRepository<E, N, P>: Send + Sync
where
    E: Send + 'static,
    N: Send + 'static,
    P: Send + 'static,
{
    async fn list_all(&self) -> AppResult<Vec<E>>;
    async fn get_by_id(&self, id: u64) -> AppResult<Option<E>>;
    async fn create(&self, new: N) -> AppResult<E>;
    async fn update(&self, id: u64, patch: P) -> AppResult<Option<E>>;
    async fn delete(&self, id: u64) -> AppResult<Option<E>>;
}

pub type UserRepository = dyn CrudRepository<User, NewUser, UserPatch>;
pub type RoleRepository = dyn CrudRepository<Role, NewRole, RolePatch>;
pub type UserRoleRepository = dyn CrudRepository<UserRole, NewUserRole, UserRolePatch>;
pub type DepartmentRepository = dyn CrudRepository<Department, NewDepartment, DepartmentPatch>;
pub type EmployeeRepository = dyn CrudRepository<Employee, NewEmployee, EmployeePatch>;

/// Queries behind login and registration.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Only users with the active flag set.
    async fn find_active_by_username(&self, username: &str) -> AppResult<Option<User>>;
    /// Ignores the active flag.
    async fn username_exists(&self, username: &str) -> AppResult<bool>;
    /// Ignores the active flag.
    async fn email_exists(&self, email: &str) -> AppResult<bool>;
    async fn create_user(&self, new: NewUser) -> AppResult<User>;
    async fn roles_by_names(&self, names: &[String]) -> AppResult<Vec<Role>>;
    async fn add_user_role(&self, new: NewUserRole) -> AppResult<UserRole>;
    /// Names of roles linked through active user-role rows.
    async fn active_role_names(&self, user_id: u64) -> AppResult<Vec<String>>;
}
