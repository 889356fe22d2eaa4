//! In-memory repositories used by the handler and service tests.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{AuthRepository, CrudRepository};
use crate::error::{AppError, AppResult};
use crate::model::{
    department::{Department, DepartmentPatch, NewDepartment},
    employee::{Employee, EmployeePatch, NewEmployee, professional_email},
    role::{NewRole, Role, RolePatch},
    user::{NewUser, User, UserPatch},
    user_role::{NewUserRole, UserRole, UserRolePatch},
};

/// Row type storable in a `MemoryRepository`.
pub trait Record: Clone + Send + Sync + 'static {
    type New: Send + 'static;
    type Patch: Send + 'static;

    fn from_new(id: u64, new: Self::New) -> Self;
    fn apply(&mut self, patch: Self::Patch);
}

/// Clones share the same rows.
pub struct MemoryRepository<E> {
    rows: Arc<RwLock<BTreeMap<u64, E>>>,
    next_id: Arc<AtomicU64>,
    offline: Arc<AtomicBool>,
}

impl<E> Clone for MemoryRepository<E> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
            next_id: Arc::clone(&self.next_id),
            offline: Arc::clone(&self.offline),
        }
    }
}

impl<E: Record> MemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            offline: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Every later repository call fails the way a dropped connection would.
    pub fn take_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    fn ensure_online(&self, operation: &'static str) -> AppResult<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::database(operation)(sqlx::Error::PoolClosed));
        }
        Ok(())
    }

    /// Applies `change` to the row with `id`, if there is one.
    pub async fn modify(
        &self,
        id: u64,
        operation: &'static str,
        change: impl FnOnce(&mut E),
    ) -> AppResult<Option<E>> {
        self.ensure_online(operation)?;
        let mut rows = self.rows.write().await;
        Ok(rows.get_mut(&id).map(|row| {
            change(row);
            row.clone()
        }))
    }

    pub async fn insert(&self, new: E::New) -> E {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let row = E::from_new(id, new);
        self.rows.write().await.insert(id, row.clone());
        row
    }

    pub async fn find(&self, predicate: impl Fn(&E) -> bool) -> Option<E> {
        self.rows.read().await.values().find(|r| predicate(r)).cloned()
    }

    pub async fn filter(&self, predicate: impl Fn(&E) -> bool) -> Vec<E> {
        self.rows
            .read()
            .await
            .values()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }
}

#[async_trait]
impl<E: Record> CrudRepository<E, E::New, E::Patch> for MemoryRepository<E> {
    async fn list_all(&self) -> AppResult<Vec<E>> {
        self.ensure_online("ListAll")?;
        Ok(self.rows.read().await.values().cloned().collect())
    }

    async fn get_by_id(&self, id: u64) -> AppResult<Option<E>> {
        self.ensure_online("GetById")?;
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn create(&self, new: E::New) -> AppResult<E> {
        self.ensure_online("Create")?;
        Ok(self.insert(new).await)
    }

    async fn update(&self, id: u64, patch: E::Patch) -> AppResult<Option<E>> {
        self.modify(id, "Update", |row| row.apply(patch)).await
    }

    async fn delete(&self, id: u64) -> AppResult<Option<E>> {
        self.ensure_online("Delete")?;
        Ok(self.rows.write().await.remove(&id))
    }
}

/// Employee store that gives a linked user the professional email address
/// on create, all or nothing like the MySQL transaction.
#[derive(Clone)]
pub struct MemoryEmployees {
    pub employees: MemoryRepository<Employee>,
    pub users: MemoryRepository<User>,
    email_domain: String,
}

impl MemoryEmployees {
    pub fn new(users: MemoryRepository<User>, email_domain: impl Into<String>) -> Self {
        Self {
            employees: MemoryRepository::new(),
            users,
            email_domain: email_domain.into(),
        }
    }
}

#[async_trait]
impl CrudRepository<Employee, NewEmployee, EmployeePatch> for MemoryEmployees {
    async fn list_all(&self) -> AppResult<Vec<Employee>> {
        self.employees.list_all().await
    }

    async fn get_by_id(&self, id: u64) -> AppResult<Option<Employee>> {
        self.employees.get_by_id(id).await
    }

    async fn create(&self, new: NewEmployee) -> AppResult<Employee> {
        self.employees.ensure_online("AddEmployee")?;

        if let Some(user_id) = new.user_id.filter(|&uid| uid > 0) {
            let email = professional_email(&new.first_name, &new.last_name, &self.email_domain);
            self.users
                .modify(user_id, "UpdateUserEmailOnEmployeeConversion", |user| {
                    user.email = email;
                    user.updated_on = Some(Utc::now().naive_utc());
                })
                .await?;
        }

        Ok(self.employees.insert(new).await)
    }

    async fn update(&self, id: u64, patch: EmployeePatch) -> AppResult<Option<Employee>> {
        self.employees.update(id, patch).await
    }

    async fn delete(&self, id: u64) -> AppResult<Option<Employee>> {
        self.employees.delete(id).await
    }
}

impl Record for User {
    type New = NewUser;
    type Patch = UserPatch;

    fn from_new(id: u64, new: NewUser) -> Self {
        User {
            id,
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            password_salt: new.password_salt,
            is_active: new.is_active,
            created_on: Utc::now().naive_utc(),
            created_by: new.created_by,
            updated_on: None,
            updated_by: None,
        }
    }

    fn apply(&mut self, patch: UserPatch) {
        self.username = patch.username;
        self.email = patch.email;
        self.updated_by = patch.updated_by;
        self.updated_on = Some(Utc::now().naive_utc());
    }
}

impl Record for Role {
    type New = NewRole;
    type Patch = RolePatch;

    fn from_new(id: u64, new: NewRole) -> Self {
        Role {
            id,
            name: new.name,
            is_active: new.is_active,
            created_on: Utc::now().naive_utc(),
            created_by: new.created_by,
            updated_on: None,
            updated_by: None,
        }
    }

    fn apply(&mut self, patch: RolePatch) {
        self.name = patch.name;
        self.updated_by = patch.updated_by;
        self.updated_on = Some(Utc::now().naive_utc());
    }
}

impl Record for UserRole {
    type New = NewUserRole;
    type Patch = UserRolePatch;

    fn from_new(id: u64, new: NewUserRole) -> Self {
        UserRole {
            id,
            user_id: new.user_id,
            role_id: new.role_id,
            is_active: new.is_active,
            created_on: Utc::now().naive_utc(),
            created_by: new.created_by,
            updated_on: None,
            updated_by: None,
        }
    }

    fn apply(&mut self, patch: UserRolePatch) {
        self.user_id = patch.user_id;
        self.role_id = patch.role_id;
        self.is_active = patch.is_active;
        self.updated_by = patch.updated_by;
        self.updated_on = Some(Utc::now().naive_utc());
    }
}

impl Record for Department {
    type New = NewDepartment;
    type Patch = DepartmentPatch;

    fn from_new(id: u64, new: NewDepartment) -> Self {
        Department {
            id,
            name: new.name,
            is_active: new.is_active,
        }
    }

    fn apply(&mut self, patch: DepartmentPatch) {
        self.name = patch.name;
    }
}

impl Record for Employee {
    type New = NewEmployee;
    type Patch = EmployeePatch;

    fn from_new(id: u64, new: NewEmployee) -> Self {
        Employee {
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
        }
    }

    fn apply(&mut self, patch: EmployeePatch) {
        self.first_name = patch.first_name;
        self.last_name = patch.last_name;
        self.department_id = patch.department_id;
        self.role_id = patch.role_id;
        self.is_active = patch.is_active;
    }
}

/// Auth queries over the same stores the user, role and user-role
/// repositories use.
#[derive(Clone)]
pub struct MemoryAuthRepository {
    pub users: MemoryRepository<User>,
    pub roles: MemoryRepository<Role>,
    pub user_roles: MemoryRepository<UserRole>,
}

impl MemoryAuthRepository {
    pub fn new() -> Self {
        Self {
            users: MemoryRepository::new(),
            roles: MemoryRepository::new(),
            user_roles: MemoryRepository::new(),
        }
    }

    pub async fn seed_role(&self, name: &str) -> Role {
        self.roles
            .insert(NewRole {
                name: name.to_string(),
                is_active: true,
                created_by: None,
            })
            .await
    }
}

#[async_trait]
impl AuthRepository for MemoryAuthRepository {
    async fn find_active_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .find(|u| u.username == username && u.is_active)
            .await)
    }

    async fn username_exists(&self, username: &str) -> AppResult<bool> {
        Ok(self.users.find(|u| u.username == username).await.is_some())
    }

    async fn email_exists(&self, email: &str) -> AppResult<bool> {
        Ok(self.users.find(|u| u.email == email).await.is_some())
    }

    async fn create_user(&self, new: NewUser) -> AppResult<User> {
        Ok(self.users.insert(new).await)
    }

    async fn roles_by_names(&self, names: &[String]) -> AppResult<Vec<Role>> {
        Ok(self.roles.filter(|r| names.contains(&r.name)).await)
    }

    async fn add_user_role(&self, new: NewUserRole) -> AppResult<UserRole> {
        Ok(self.user_roles.insert(new).await)
    }

    async fn active_role_names(&self, user_id: u64) -> AppResult<Vec<String>> {
        let links = self
            .user_roles
            .filter(|ur| ur.user_id == user_id && ur.is_active)
            .await;
        let roles = self.roles.list_all().await?;

        Ok(links
            .iter()
            .filter_map(|ur| roles.iter().find(|r| r.id == ur.role_id))
            .map(|r| r.name.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_update_and_delete_missing_ids() {
        let departments: MemoryRepository<Department> = MemoryRepository::new();
        let patch = DepartmentPatch {
            name: "Ops".to_string(),
        };

        assert!(departments.update(99, patch).await.unwrap().is_none());
        assert!(departments.delete(99).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ids_are_generated_in_order() {
        let departments: MemoryRepository<Department> = MemoryRepository::new();
        let a = departments
            .create(NewDepartment {
                name: "HR".to_string(),
                is_active: true,
            })
            .await
            .unwrap();
        let b = departments
            .create(NewDepartment {
                name: "IT".to_string(),
                is_active: true,
            })
            .await
            .unwrap();

        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(departments.len().await, 2);
    }

    fn new_employee(user_id: Option<u64>) -> NewEmployee {
        NewEmployee {
            first_name: "Mary Ann".to_string(),
            last_name: "Smith".to_string(),
            contact_no: String::new(),
            date_of_birth: chrono::NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            department_id: 1,
            role_id: 1,
            hire_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            salary: 1000.0,
            manager_id: None,
            is_active: true,
            user_id,
        }
    }

    async fn seed_user(users: &MemoryRepository<User>) -> User {
        users
            .insert(NewUser {
                username: "mary".to_string(),
                email: "mary@home.net".to_string(),
                password_hash: Vec::new(),
                password_salt: Vec::new(),
                is_active: true,
                created_by: None,
            })
            .await
    }

    #[tokio::test]
    async fn test_employee_conversion_rewrites_user_email() {
        let users = MemoryRepository::new();
        let user = seed_user(&users).await;
        let employees = MemoryEmployees::new(users.clone(), "corp.io");

        employees.create(new_employee(Some(user.id))).await.unwrap();

        let stored = users.get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.email, "maryann.smith@corp.io");
        assert!(stored.updated_on.is_some());
    }

    #[tokio::test]
    async fn test_unlinked_employee_leaves_users_alone() {
        let users = MemoryRepository::new();
        let user = seed_user(&users).await;
        let employees = MemoryEmployees::new(users.clone(), "corp.io");

        employees.create(new_employee(None)).await.unwrap();
        employees.create(new_employee(Some(0))).await.unwrap();

        let stored = users.get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.email, "mary@home.net");
        assert_eq!(employees.employees.len().await, 2);
    }

    #[tokio::test]
    async fn test_failed_conversion_adds_no_employee() {
        let users = MemoryRepository::new();
        let user = seed_user(&users).await;
        let employees = MemoryEmployees::new(users.clone(), "corp.io");
        users.take_offline();

        match employees.create(new_employee(Some(user.id))).await {
            Err(AppError::Database { operation, .. }) => {
                assert_eq!(operation, "UpdateUserEmailOnEmployeeConversion")
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(employees.employees.len().await, 0);
    }
}
