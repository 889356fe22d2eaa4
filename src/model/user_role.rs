use chrono::NaiveDateTime;

/// Link between a user and a role. The same pair may appear more than once.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRole {
    pub id: u64,
    pub user_id: u64,
    pub role_id: u64,
    pub is_active: bool,
    pub created_on: NaiveDateTime,
    pub created_by: Option<u64>,
    pub updated_on: Option<NaiveDateTime>,
    pub updated_by: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct NewUserRole {
    pub user_id: u64,
    pub role_id: u64,
    pub is_active: bool,
    pub created_by: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct UserRolePatch {
    pub user_id: u64,
    pub role_id: u64,
    pub is_active: bool,
    pub updated_by: Option<u64>,
}
