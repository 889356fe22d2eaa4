use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;
use validator::Validate;

use super::{created, default_true};
use crate::error::{AppError, AppResult};
use crate::model::department::{Department, DepartmentPatch, NewDepartment};
use crate::repository::DepartmentRepository;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DepartmentDto {
    #[serde(rename = "departmentID")]
    #[schema(example = 1)]
    pub department_id: u64,
    #[serde(rename = "departmentName")]
    #[schema(example = "HR")]
    pub department_name: String,
    #[serde(rename = "isActive")]
    pub is_active: bool,
}

impl From<Department> for DepartmentDto {
    fn from(d: Department) -> Self {
        Self {
            department_id: d.id,
            department_name: d.name,
            is_active: d.is_active,
        }
    }
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct CreateDepartmentDto {
    #[serde(rename = "departmentName", default)]
    #[validate(length(min = 1, max = 150))]
    #[schema(example = "HR")]
    pub department_name: String,
    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct UpdateDepartmentDto {
    #[serde(rename = "departmentName", default)]
    #[validate(length(min = 1, max = 150))]
    #[schema(example = "Human Resources")]
    pub department_name: String,
}

/// List departments
#[utoipa::path(
    get,
    path = "/api/departments",
    responses((status = 200, description = "All departments", body = [DepartmentDto])),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
pub async fn list_departments(repo: web::Data<DepartmentRepository>) -> AppResult<HttpResponse> {
    let departments: Vec<DepartmentDto> = repo
        .list_all()
        .await?
        .into_iter()
        .map(DepartmentDto::from)
        .collect();

    info!(count = departments.len(), "Departments retrieved");
    Ok(HttpResponse::Ok().json(departments))
}

/// Get a department by id
#[utoipa::path(
    get,
    path = "/api/departments/{id}",
    params(("id" = u64, Path, description = "Department id")),
    responses(
        (status = 200, description = "Department found", body = DepartmentDto),
        (status = 404, description = "Department not found")
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
pub async fn get_department(
    path: web::Path<u64>,
    repo: web::Data<DepartmentRepository>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let department = repo.get_by_id(id).await?.ok_or_else(|| {
        warn!(id, "Department not found");
        AppError::not_found("Department", id)
    })?;

    Ok(HttpResponse::Ok().json(DepartmentDto::from(department)))
}

/// Create a department
#[utoipa::path(
    post,
    path = "/api/departments",
    request_body = CreateDepartmentDto,
    responses(
        (status = 201, description = "Department created", body = DepartmentDto),
        (status = 400, description = "Validation failed")
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
pub async fn create_department(
    req: HttpRequest,
    payload: web::Json<CreateDepartmentDto>,
    repo: web::Data<DepartmentRepository>,
) -> AppResult<HttpResponse> {
    payload.validate()?;
    let payload = payload.into_inner();

    let department = repo
        .create(NewDepartment {
            name: payload.department_name,
            is_active: payload.is_active,
        })
        .await?;

    info!(id = department.id, "Department created");
    Ok(created(&req, department.id, &DepartmentDto::from(department)))
}

/// Rename a department
#[utoipa::path(
    put,
    path = "/api/departments/{id}",
    params(("id" = u64, Path, description = "Department id")),
    request_body = UpdateDepartmentDto,
    responses(
        (status = 200, description = "Department updated", body = DepartmentDto),
        (status = 404, description = "Department not found")
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
pub async fn update_department(
    path: web::Path<u64>,
    payload: web::Json<UpdateDepartmentDto>,
    repo: web::Data<DepartmentRepository>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    payload.validate()?;

    let department = repo
        .update(
            id,
            DepartmentPatch {
                name: payload.into_inner().department_name,
            },
        )
        .await?
        .ok_or_else(|| AppError::not_found("Department", id))?;

    info!(id, "Department updated");
    Ok(HttpResponse::Ok().json(DepartmentDto::from(department)))
}

/// Delete a department
#[utoipa::path(
    delete,
    path = "/api/departments/{id}",
    params(("id" = u64, Path, description = "Department id")),
    responses(
        (status = 200, description = "Deleted department", body = DepartmentDto),
        (status = 404, description = "Department not found")
    ),
    tag = "Departments",
    security(("bearer_auth" = []))
)]
pub async fn delete_department(
    path: web::Path<u64>,
    repo: web::Data<DepartmentRepository>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let department = repo
        .delete(id)
        .await?
        .ok_or_else(|| AppError::not_found("Department", id))?;

    info!(id, "Department deleted");
    Ok(HttpResponse::Ok().json(DepartmentDto::from(department)))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, http::header::LOCATION, test};
    use serde_json::{Value, json};

    use crate::routes::{AppServices, test_app};

    #[actix_web::test]
    async fn test_department_lifecycle() {
        let (services, _) = AppServices::in_memory();
        let token = services.test_token();
        let app = test_app!(services);

        let req = test::TestRequest::post()
            .uri("/api/departments")
            .insert_header(("Authorization", token.clone()))
            .set_json(json!({ "departmentName": "HR", "isActive": true }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let location = res.headers().get(LOCATION).unwrap().to_str().unwrap().to_string();
        let created: Value = test::read_body_json(res).await;
        let id = created["departmentID"].as_u64().unwrap();
        assert_eq!(location, format!("/api/departments/{id}"));

        let req = test::TestRequest::get()
            .uri(&format!("/api/departments/{id}"))
            .insert_header(("Authorization", token.clone()))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let fetched: Value = test::read_body_json(res).await;
        assert_eq!(fetched["departmentName"], "HR");
        assert_eq!(fetched["isActive"], true);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/departments/{id}"))
            .insert_header(("Authorization", token.clone()))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/api/departments/{id}"))
            .insert_header(("Authorization", token))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["success"], false);
        assert_eq!(
            body["message"],
            "We couldn't find the department you're looking for. It may have been removed or the ID might be incorrect."
        );
    }

    #[actix_web::test]
    async fn test_update_only_renames() {
        let (services, _) = AppServices::in_memory();
        let token = services.test_token();
        let app = test_app!(services);

        let req = test::TestRequest::post()
            .uri("/api/departments")
            .insert_header(("Authorization", token.clone()))
            .set_json(json!({ "departmentName": "IT", "isActive": false }))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["departmentID"].as_u64().unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/api/departments/{id}"))
            .insert_header(("Authorization", token))
            .set_json(json!({ "departmentName": "Engineering", "isActive": true }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let updated: Value = test::read_body_json(res).await;
        assert_eq!(updated["departmentName"], "Engineering");
        assert_eq!(updated["isActive"], false);
        assert_eq!(updated["departmentID"], id);
    }

    #[actix_web::test]
    async fn test_update_and_delete_missing_department() {
        let (services, _) = AppServices::in_memory();
        let token = services.test_token();
        let app = test_app!(services);

        let req = test::TestRequest::put()
            .uri("/api/departments/999")
            .insert_header(("Authorization", token.clone()))
            .set_json(json!({ "departmentName": "Ghost" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::delete()
            .uri("/api/departments/999")
            .insert_header(("Authorization", token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_blank_name_is_validation_error() {
        let (services, _) = AppServices::in_memory();
        let token = services.test_token();
        let app = test_app!(services);

        let req = test::TestRequest::post()
            .uri("/api/departments")
            .insert_header(("Authorization", token))
            .set_json(json!({ "departmentName": "" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["title"], "Invalid Information");
        assert_eq!(
            body["fieldErrors"]["department name"][0],
            "Please enter your department name."
        );
    }

    #[actix_web::test]
    async fn test_requires_bearer_token() {
        let (services, _) = AppServices::in_memory();
        let app = test_app!(services);

        let req = test::TestRequest::get().uri("/api/departments").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
