use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct Employee {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub contact_no: String,
    pub date_of_birth: NaiveDate,
    pub department_id: u64,
    pub role_id: u64,
    pub hire_date: NaiveDate,
    pub salary: f64,
    /// Reporting line; not checked against existing employees.
    pub manager_id: Option<u64>,
    pub is_active: bool,
    pub user_id: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub contact_no: String,
    pub date_of_birth: NaiveDate,
    pub department_id: u64,
    pub role_id: u64,
    pub hire_date: NaiveDate,
    pub salary: f64,
    pub manager_id: Option<u64>,
    pub is_active: bool,
    pub user_id: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct EmployeePatch {
    pub first_name: String,
    pub last_name: String,
    pub department_id: u64,
    pub role_id: u64,
    pub is_active: bool,
}

/// Company address an employee's linked user is switched to on creation:
/// `first.last@domain`, lower-cased, spaces dropped.
pub fn professional_email(first_name: &str, last_name: &str, domain: &str) -> String {
    let clean = |s: &str| -> String {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase()
    };
    format!("{}.{}@{}", clean(first_name), clean(last_name), domain.trim().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_professional_email() {
        assert_eq!(
            professional_email("John", "Doe", "company.com"),
            "john.doe@company.com"
        );
        assert_eq!(
            professional_email("Mary Ann", " Van Dyke ", "Corp.Example"),
            "maryann.vandyke@corp.example"
        );
    }
}
