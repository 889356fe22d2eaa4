//! MySQL-backed repositories. Every `sqlx::Error` leaves this module wrapped
//! as `AppError::Database` with the name of the failing operation.

mod auth;
mod departments;
mod employees;
mod roles;
mod user_roles;
mod users;

pub use auth::MySqlAuthRepository;
pub use departments::MySqlDepartments;
pub use employees::MySqlEmployees;
pub use roles::MySqlRoles;
pub use user_roles::MySqlUserRoles;
pub use users::MySqlUsers;

/// SQLSTATE raised by MySQL for unique key violations.
const DUPLICATE_KEY: &str = "23000";

fn is_duplicate_key(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(DUPLICATE_KEY),
        _ => false,
    }
}
