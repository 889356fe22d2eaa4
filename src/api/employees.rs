use actix_web::{HttpRequest, HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;
use validator::Validate;

use super::{created, default_true};
use crate::error::{AppError, AppResult};
use crate::model::employee::{Employee, EmployeePatch, NewEmployee};
use crate::repository::EmployeeRepository;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeDto {
    #[serde(rename = "employeeID")]
    pub employee_id: u64,
    #[schema(example = "John")]
    pub first_name: String,
    #[schema(example = "Doe")]
    pub last_name: String,
    #[schema(example = "+8801712345678")]
    pub contact_no: String,
    #[schema(example = "1990-05-17", value_type = String, format = "date")]
    pub date_of_birth: NaiveDate,
    #[serde(rename = "departmentID")]
    pub department_id: u64,
    #[serde(rename = "roleID")]
    pub role_id: u64,
    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub hire_date: NaiveDate,
    #[schema(example = 55000.0)]
    pub salary: f64,
    #[serde(rename = "managerID", skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<u64>,
    pub is_active: bool,
    #[serde(rename = "userID")]
    pub user_id: Option<u64>,
}

impl From<Employee> for EmployeeDto {
    fn from(e: Employee) -> Self {
        Self {
            employee_id: e.id,
            first_name: e.first_name,
            last_name: e.last_name,
            contact_no: e.contact_no,
            date_of_birth: e.date_of_birth,
            department_id: e.department_id,
            role_id: e.role_id,
            hire_date: e.hire_date,
            salary: e.salary,
            manager_id: e.manager_id,
            is_active: e.is_active,
            user_id: e.user_id,
        }
    }
}

#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeDto {
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "John")]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Doe")]
    pub last_name: String,
    #[serde(default)]
    #[validate(length(max = 30))]
    #[schema(example = "+8801712345678")]
    pub contact_no: String,
    #[schema(example = "1990-05-17", value_type = String, format = "date")]
    pub date_of_birth: NaiveDate,
    #[serde(rename = "departmentID")]
    #[validate(range(min = 1))]
    pub department_id: u64,
    #[serde(rename = "roleID")]
    #[validate(range(min = 1))]
    pub role_id: u64,
    #[schema(example = "2024-01-01", value_type = String, format = "date")]
    pub hire_date: NaiveDate,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub salary: f64,
    #[serde(rename = "managerID", default)]
    pub manager_id: Option<u64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(rename = "userID", default)]
    pub user_id: Option<u64>,
}

#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeDto {
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[serde(rename = "departmentID")]
    #[validate(range(min = 1))]
    pub department_id: u64,
    #[serde(rename = "roleID")]
    #[validate(range(min = 1))]
    pub role_id: u64,
    pub is_active: bool,
}

#[utoipa::path(
    get,
    path = "/api/employees",
    responses((status = 200, description = "All employees", body = [EmployeeDto])),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
pub async fn list_employees(repo: web::Data<EmployeeRepository>) -> AppResult<HttpResponse> {
    let employees: Vec<EmployeeDto> = repo
        .list_all()
        .await?
        .into_iter()
        .map(EmployeeDto::from)
        .collect();

    info!(count = employees.len(), "Employees retrieved");
    Ok(HttpResponse::Ok().json(employees))
}

#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(("id" = u64, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Employee found", body = EmployeeDto),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
pub async fn get_employee(
    path: web::Path<u64>,
    repo: web::Data<EmployeeRepository>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let employee = repo.get_by_id(id).await?.ok_or_else(|| {
        warn!(id, "Employee not found");
        AppError::not_found("Employee", id)
    })?;

    Ok(HttpResponse::Ok().json(EmployeeDto::from(employee)))
}

/// Create an employee. A linked user gets the company email address.
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployeeDto,
    responses(
        (status = 201, description = "Employee created", body = EmployeeDto),
        (status = 400, description = "Validation failed")
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
pub async fn create_employee(
    req: HttpRequest,
    payload: web::Json<CreateEmployeeDto>,
    repo: web::Data<EmployeeRepository>,
) -> AppResult<HttpResponse> {
    payload.validate()?;
    let p = payload.into_inner();

    let employee = repo
        .create(NewEmployee {
            first_name: p.first_name,
            last_name: p.last_name,
            contact_no: p.contact_no,
            date_of_birth: p.date_of_birth,
            department_id: p.department_id,
            role_id: p.role_id,
            hire_date: p.hire_date,
            salary: p.salary,
            manager_id: p.manager_id,
            is_active: p.is_active,
            user_id: p.user_id,
        })
        .await?;

    info!(id = employee.id, "Employee created");
    Ok(created(&req, employee.id, &EmployeeDto::from(employee)))
}

#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(("id" = u64, Path, description = "Employee id")),
    request_body = UpdateEmployeeDto,
    responses(
        (status = 200, description = "Employee updated", body = EmployeeDto),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
pub async fn update_employee(
    path: web::Path<u64>,
    payload: web::Json<UpdateEmployeeDto>,
    repo: web::Data<EmployeeRepository>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    payload.validate()?;
    let p = payload.into_inner();

    let employee = repo
        .update(
            id,
            EmployeePatch {
                first_name: p.first_name,
                last_name: p.last_name,
                department_id: p.department_id,
                role_id: p.role_id,
                is_active: p.is_active,
            },
        )
        .await?
        .ok_or_else(|| AppError::not_found("Employee", id))?;

    info!(id, "Employee updated");
    Ok(HttpResponse::Ok().json(EmployeeDto::from(employee)))
}

#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(("id" = u64, Path, description = "Employee id")),
    responses(
        (status = 200, description = "Deleted employee", body = EmployeeDto),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employees",
    security(("bearer_auth" = []))
)]
pub async fn delete_employee(
    path: web::Path<u64>,
    repo: web::Data<EmployeeRepository>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let employee = repo
        .delete(id)
        .await?
        .ok_or_else(|| AppError::not_found("Employee", id))?;

    info!(id, "Employee deleted");
    Ok(HttpResponse::Ok().json(EmployeeDto::from(employee)))
}
