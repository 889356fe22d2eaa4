pub mod department;
pub mod employee;
pub mod role;
pub mod user;
pub mod user_role;
