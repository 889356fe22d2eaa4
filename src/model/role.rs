use chrono::NaiveDateTime;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Role {
    pub id: u64,
    pub name: String,
    pub is_active: bool,
    pub created_on: NaiveDateTime,
    pub created_by: Option<u64>,
    pub updated_on: Option<NaiveDateTime>,
    pub updated_by: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct NewRole {
    pub name: String,
    pub is_active: bool,
    pub created_by: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct RolePatch {
    pub name: String,
    pub updated_by: Option<u64>,
}
