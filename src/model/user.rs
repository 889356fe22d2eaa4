use chrono::NaiveDateTime;

/// Row of `users`. Carries password material, so it is never serialized;
/// controllers map it to `UserDto`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub password_hash: Vec<u8>,
    pub password_salt: Vec<u8>,
    pub is_active: bool,
    pub created_on: NaiveDateTime,
    pub created_by: Option<u64>,
    pub updated_on: Option<NaiveDateTime>,
    pub updated_by: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: Vec<u8>,
    pub password_salt: Vec<u8>,
    pub is_active: bool,
    pub created_by: Option<u64>,
}

/// Mutable fields of a user: username and email.
#[derive(Debug, Clone)]
pub struct UserPatch {
    pub username: String,
    pub email: String,
    pub updated_by: Option<u64>,
}
