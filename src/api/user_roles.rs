use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;
use validator::Validate;

use super::{created, default_true};
use crate::auth::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::model::user_role::{NewUserRole, UserRole, UserRolePatch};
use crate::repository::UserRoleRepository;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserRoleDto {
    #[serde(rename = "userRoleID")]
    pub user_role_id: u64,
    #[serde(rename = "userID")]
    pub user_id: u64,
    #[serde(rename = "roleID")]
    pub role_id: u64,
    #[serde(rename = "isActive")]
    pub is_active: bool,
}

impl From<UserRole> for UserRoleDto {
    fn from(ur: UserRole) -> Self {
        Self {
            user_role_id: ur.id,
            user_id: ur.user_id,
            role_id: ur.role_id,
            is_active: ur.is_active,
        }
    }
}

/// Body of both create and update.
#[derive(Deserialize, Validate, ToSchema)]
pub struct UserRoleRequestDto {
    #[serde(rename = "userID")]
    #[validate(range(min = 1))]
    #[schema(example = 1)]
    pub user_id: u64,
    #[serde(rename = "roleID")]
    #[validate(range(min = 1))]
    #[schema(example = 2)]
    pub role_id: u64,
    #[serde(rename = "isActive", default = "default_true")]
    pub is_active: bool,
}

#[utoipa::path(
    get,
    path = "/api/userrole",
    responses((status = 200, description = "All user role links", body = [UserRoleDto])),
    tag = "UserRole",
    security(("bearer_auth" = []))
)]
pub async fn list_user_roles(repo: web::Data<UserRoleRepository>) -> AppResult<HttpResponse> {
    let links: Vec<UserRoleDto> = repo
        .list_all()
        .await?
        .into_iter()
        .map(UserRoleDto::from)
        .collect();
    Ok(HttpResponse::Ok().json(links))
}

#[utoipa::path(
    get,
    path = "/api/userrole/{id}",
    params(("id" = u64, Path, description = "User role id")),
    responses(
        (status = 200, description = "User role found", body = UserRoleDto),
        (status = 404, description = "User role not found")
    ),
    tag = "UserRole",
    security(("bearer_auth" = []))
)]
pub async fn get_user_role(
    path: web::Path<u64>,
    repo: web::Data<UserRoleRepository>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let link = repo
        .get_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("UserRole", id))?;
    Ok(HttpResponse::Ok().json(UserRoleDto::from(link)))
}

#[utoipa::path(
    post,
    path = "/api/userrole",
    request_body = UserRoleRequestDto,
    responses((status = 201, description = "User role created", body = UserRoleDto)),
    tag = "UserRole",
    security(("bearer_auth" = []))
)]
pub async fn create_user_role(
    req: HttpRequest,
    caller: AuthUser,
    payload: web::Json<UserRoleRequestDto>,
    repo: web::Data<UserRoleRepository>,
) -> AppResult<HttpResponse> {
    payload.validate()?;

    let link = repo
        .create(NewUserRole {
            user_id: payload.user_id,
            role_id: payload.role_id,
            is_active: payload.is_active,
            created_by: Some(caller.user_id),
        })
        .await?;

    info!(id = link.id, user_id = link.user_id, role_id = link.role_id, "User role created");
    Ok(created(&req, link.id, &UserRoleDto::from(link)))
}

#[utoipa::path(
    put,
    path = "/api/userrole/{id}",
    params(("id" = u64, Path, description = "User role id")),
    request_body = UserRoleRequestDto,
    responses(
        (status = 200, description = "User role updated", body = UserRoleDto),
        (status = 404, description = "User role not found")
    ),
    tag = "UserRole",
    security(("bearer_auth" = []))
)]
pub async fn update_user_role(
    path: web::Path<u64>,
    caller: AuthUser,
    payload: web::Json<UserRoleRequestDto>,
    repo: web::Data<UserRoleRepository>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    payload.validate()?;

    let link = repo
        .update(
            id,
            UserRolePatch {
                user_id: payload.user_id,
                role_id: payload.role_id,
                is_active: payload.is_active,
                updated_by: Some(caller.user_id),
            },
        )
        .await?
        .ok_or_else(|| AppError::not_found("UserRole", id))?;

    info!(id, "User role updated");
    Ok(HttpResponse::Ok().json(UserRoleDto::from(link)))
}

#[utoipa::path(
    delete,
    path = "/api/userrole/{id}",
    params(("id" = u64, Path, description = "User role id")),
    responses(
        (status = 200, description = "Deleted user role", body = UserRoleDto),
        (status = 404, description = "User role not found")
    ),
    tag = "UserRole",
    security(("bearer_auth" = []))
)]
pub async fn delete_user_role(
    path: web::Path<u64>,
    repo: web::Data<UserRoleRepository>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let link = repo
        .delete(id)
        .await?
        .ok_or_else(|| AppError::not_found("UserRole", id))?;

    info!(id, "User role deleted");
    Ok(HttpResponse::Ok().json(UserRoleDto::from(link)))
}
