#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Department {
    pub id: u64,
    pub name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewDepartment {
    pub name: String,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct DepartmentPatch {
    pub name: String,
}
