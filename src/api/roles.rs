use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

use super::{created, default_true};
use crate::auth::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::model::role::{NewRole, Role, RolePatch};
use crate::repository::RoleRepository;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleDto {
    #[serde(rename = "roleID")]
    pub role_id: u64,
    #[serde(rename = "roleName")]
    #[schema(example = "Manager")]
    pub role_name: String,
    #[serde(rename = "isActive")]
    pub is_active: bool,
}

impl From<Role> for RoleDto {
    fn from(r: Role) -> Self {
        Self {
            role_id: r.id,
            role_name: r.name,
            is_active: r.is_active,
        }
    }
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct CreateRoleDto {
    #[serde(rename = "roleName", default)]
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Manager")]
    pub role_name: String,
    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct UpdateRoleDto {
    #[serde(rename = "roleName", default)]
    #[validate(length(min = 1, max = 100))]
    pub role_name: String,
}

#[utoipa::path(
    get,
    path = "/api/roles",
    responses((status = 200, description = "All roles", body = [RoleDto])),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn list_roles(repo: web::Data<RoleRepository>) -> AppResult<HttpResponse> {
    let roles: Vec<RoleDto> = repo.list_all().await?.into_iter().map(RoleDto::from).collect();
    Ok(HttpResponse::Ok().json(roles))
}

#[utoipa::path(
    get,
    path = "/api/roles/{id}",
    params(("id" = u64, Path, description = "Role id")),
    responses(
        (status = 200, description = "Role found", body = RoleDto),
        (status = 404, description = "Role not found")
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn get_role(
    path: web::Path<u64>,
    repo: web::Data<RoleRepository>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let role = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("Role", id))?;
    Ok(HttpResponse::Ok().json(RoleDto::from(role)))
}

#[utoipa::path(
    post,
    path = "/api/roles",
    request_body = CreateRoleDto,
    responses((status = 201, description = "Role created", body = RoleDto)),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn create_role(
    req: HttpRequest,
    caller: AuthUser,
    payload: web::Json<CreateRoleDto>,
    repo: web::Data<RoleRepository>,
) -> AppResult<HttpResponse> {
    payload.validate()?;
    let payload = payload.into_inner();

    let role = repo
        .create(NewRole {
            name: payload.role_name,
            is_active: payload.is_active,
            created_by: Some(caller.user_id),
        })
        .await?;

    info!(id = role.id, created_by = caller.user_id, "Role created");
    Ok(created(&req, role.id, &RoleDto::from(role)))
}

#[utoipa::path(
    put,
    path = "/api/roles/{id}",
    params(("id" = u64, Path, description = "Role id")),
    request_body = UpdateRoleDto,
    responses(
        (status = 200, description = "Role updated", body = RoleDto),
        (status = 404, description = "Role not found")
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn update_role(
    path: web::Path<u64>,
    caller: AuthUser,
    payload: web::Json<UpdateRoleDto>,
    repo: web::Data<RoleRepository>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    payload.validate()?;

    let role = repo
        .update(
            id,
            RolePatch {
                name: payload.into_inner().role_name,
                updated_by: Some(caller.user_id),
            },
        )
        .await?
        .ok_or_else(|| AppError::not_found("Role", id))?;

    info!(id, "Role updated");
    Ok(HttpResponse::Ok().json(RoleDto::from(role)))
}

#[utoipa::path(
    delete,
    path = "/api/roles/{id}",
    params(("id" = u64, Path, description = "Role id")),
    responses(
        (status = 200, description = "Deleted role", body = RoleDto),
        (status = 404, description = "Role not found")
    ),
    tag = "Roles",
    security(("bearer_auth" = []))
)]
pub async fn delete_role(
    path: web::Path<u64>,
    repo: web::Data<RoleRepository>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let role = repo
        .delete(id)
        .await?
        .ok_or_else(|| AppError::not_found("Role", id))?;

    info!(id, "Role deleted");
    Ok(HttpResponse::Ok().json(RoleDto::from(role)))
}
