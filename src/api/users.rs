use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use tracing::{info, warn};
use utoipa::ToSchema;
use validator::Validate;

use super::created;
use crate::auth::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::model::user::{NewUser, User, UserPatch};
use crate::models::UserDto;
use crate::repository::UserRepository;

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            user_id: u.id,
            user_name: u.username,
            email_id: u.email,
        }
    }
}

/// Body of both create and update. Users created here carry no password
/// and cannot log in until they register.
#[derive(Deserialize, Validate, ToSchema)]
pub struct UserRequestDto {
    #[serde(rename = "userName", default)]
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "bob")]
    pub user_name: String,
    #[serde(rename = "emailID", default)]
    #[validate(length(min = 1, max = 255), email)]
    #[schema(example = "bob@x.com")]
    pub email_id: String,
}

#[utoipa::path(
    get,
    path = "/api/users",
    responses((status = 200, description = "All users", body = [UserDto])),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn list_users(repo: web::Data<UserRepository>) -> AppResult<HttpResponse> {
    let users: Vec<UserDto> = repo.list_all().await?.into_iter().map(UserDto::from).collect();
    info!(count = users.len(), "Users retrieved");
    Ok(HttpResponse::Ok().json(users))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = u64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 404, description = "User not found")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn get_user(
    path: web::Path<u64>,
    repo: web::Data<UserRepository>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let user = repo.get_by_id(id).await?.ok_or_else(|| {
        warn!(id, "User not found");
        AppError::not_found("User", id)
    })?;
    Ok(HttpResponse::Ok().json(UserDto::from(user)))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = UserRequestDto,
    responses(
        (status = 201, description = "User created", body = UserDto),
        (status = 409, description = "Username or email already exists")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn create_user(
    req: HttpRequest,
    caller: AuthUser,
    payload: web::Json<UserRequestDto>,
    repo: web::Data<UserRepository>,
) -> AppResult<HttpResponse> {
    payload.validate()?;
    let payload = payload.into_inner();

    let user = repo
        .create(NewUser {
            username: payload.user_name,
            email: payload.email_id,
            password_hash: Vec::new(),
            password_salt: Vec::new(),
            is_active: true,
            created_by: Some(caller.user_id),
        })
        .await?;

    info!(id = user.id, created_by = caller.user_id, "User created");
    Ok(created(&req, user.id, &UserDto::from(user)))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = u64, Path, description = "User id")),
    request_body = UserRequestDto,
    responses(
        (status = 200, description = "User updated", body = UserDto),
        (status = 404, description = "User not found")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn update_user(
    path: web::Path<u64>,
    caller: AuthUser,
    payload: web::Json<UserRequestDto>,
    repo: web::Data<UserRepository>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    payload.validate()?;
    let payload = payload.into_inner();

    let user = repo
        .update(
            id,
            UserPatch {
                username: payload.user_name,
                email: payload.email_id,
                updated_by: Some(caller.user_id),
            },
        )
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;

    info!(id, "User updated");
    Ok(HttpResponse::Ok().json(UserDto::from(user)))
}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = u64, Path, description = "User id")),
    responses(
        (status = 200, description = "Deleted user", body = UserDto),
        (status = 404, description = "User not found")
    ),
    tag = "Users",
    security(("bearer_auth" = []))
)]
pub async fn delete_user(
    path: web::Path<u64>,
    repo: web::Data<UserRepository>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let user = repo
        .delete(id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;

    info!(id, "User deleted");
    Ok(HttpResponse::Ok().json(UserDto::from(user)))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::{Value, json};

    use crate::routes::{AppServices, test_app};

    #[actix_web::test]
    async fn test_create_and_update_user() {
        let (services, auth) = AppServices::in_memory();
        let token = services.test_token();
        let app = test_app!(services);

        let req = test::TestRequest::post()
            .uri("/api/users")
            .insert_header(("Authorization", token.clone()))
            .set_json(json!({ "userName": "bob", "emailID": "bob@x.com" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["userName"], "bob");
        assert!(body.get("passwordHash").is_none());
        let id = body["userID"].as_u64().unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/api/users/{id}"))
            .insert_header(("Authorization", token))
            .set_json(json!({ "userName": "robert", "emailID": "robert@x.com" }))
            .to_request();
        let updated: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(updated["userName"], "robert");
        assert_eq!(updated["emailID"], "robert@x.com");

        let stored = auth.users.find(|u| u.id == id).await.unwrap();
        assert_eq!(stored.updated_by, Some(AppServices::TEST_USER_ID));
        assert!(stored.updated_on.is_some());
    }

    #[actix_web::test]
    async fn test_invalid_email_field_error() {
        let (services, _) = AppServices::in_memory();
        let token = services.test_token();
        let app = test_app!(services);

        let req = test::TestRequest::post()
            .uri("/api/users")
            .insert_header(("Authorization", token))
            .set_json(json!({ "userName": "bob", "emailID": "not-an-email" }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(
            body["fieldErrors"]["email id"][0],
            "Please enter a valid email address (e.g., name@example.com)."
        );
    }

    #[actix_web::test]
    async fn test_missing_user() {
        let (services, _) = AppServices::in_memory();
        let token = services.test_token();
        let app = test_app!(services);

        for req in [
            test::TestRequest::get().uri("/api/users/12"),
            test::TestRequest::delete().uri("/api/users/12"),
            test::TestRequest::put()
                .uri("/api/users/12")
                .set_json(json!({ "userName": "x", "emailID": "x@x.com" })),
        ] {
            let req = req.insert_header(("Authorization", token.clone())).to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
        }
    }
}
