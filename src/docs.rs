use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::{
    departments::{CreateDepartmentDto, DepartmentDto, UpdateDepartmentDto},
    employees::{CreateEmployeeDto, EmployeeDto, UpdateEmployeeDto},
    roles::{CreateRoleDto, RoleDto, UpdateRoleDto},
    user_roles::{UserRoleDto, UserRoleRequestDto},
    users::UserRequestDto,
};
use crate::models::{
    LoginEnvelope, LoginReqDto, LoginResponse, RegisterReqDto, RegisterResponse, UserDto,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Employee Management System API",
        version = "1.0.0",
        description = r#"
## Employee Management System

CRUD API for **users**, **employees**, **departments**, **roles** and
**user role** assignments.

### Security
Everything except `/api/auth/*` requires a **JWT Bearer** token obtained from
`POST /api/auth/login`.

### Errors
Failures share one JSON envelope: `success`, `title`, `message`,
`suggestion`, `traceId` and, for validation failures, `fieldErrors`.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,
        crate::auth::handlers::test,

        crate::api::users::list_users,
        crate::api::users::get_user,
        crate::api::users::create_user,
        crate::api::users::update_user,
        crate::api::users::delete_user,

        crate::api::employees::list_employees,
        crate::api::employees::get_employee,
        crate::api::employees::create_employee,
        crate::api::employees::update_employee,
        crate::api::employees::delete_employee,

        crate::api::departments::list_departments,
        crate::api::departments::get_department,
        crate::api::departments::create_department,
        crate::api::departments::update_department,
        crate::api::departments::delete_department,

        crate::api::roles::list_roles,
        crate::api::roles::get_role,
        crate::api::roles::create_role,
        crate::api::roles::update_role,
        crate::api::roles::delete_role,

        crate::api::user_roles::list_user_roles,
        crate::api::user_roles::get_user_role,
        crate::api::user_roles::create_user_role,
        crate::api::user_roles::update_user_role,
        crate::api::user_roles::delete_user_role
    ),
    components(
        schemas(
            RegisterReqDto,
            LoginReqDto,
            LoginResponse,
            LoginEnvelope,
            RegisterResponse,
            UserDto,
            UserRequestDto,
            EmployeeDto,
            CreateEmployeeDto,
            UpdateEmployeeDto,
            DepartmentDto,
            CreateDepartmentDto,
            UpdateDepartmentDto,
            RoleDto,
            CreateRoleDto,
            UpdateRoleDto,
            UserRoleDto,
            UserRoleRequestDto
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration and login"),
        (name = "Users", description = "User management APIs"),
        (name = "Employees", description = "Employee management APIs"),
        (name = "Departments", description = "Department management APIs"),
        (name = "Roles", description = "Role management APIs"),
        (name = "UserRole", description = "User role assignment APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_resources() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/login",
            "/api/users/{id}",
            "/api/employees",
            "/api/departments/{id}",
            "/api/roles",
            "/api/userrole/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path}");
        }
        let schemes = doc.components.unwrap().security_schemes;
        assert!(schemes.contains_key("bearer_auth"));
    }
}
