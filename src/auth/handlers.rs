use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde_json::json;
use tracing::{info, instrument};
use validator::Validate;

use crate::auth::service::AuthService;
use crate::error::{AppError, AppResult, UnauthorizedReason};
use crate::models::{LoginEnvelope, LoginReqDto, RegisterReqDto, RegisterResponse};

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterReqDto,
    responses(
        (status = 200, description = "User registered", body = RegisterResponse),
        (status = 400, description = "Validation failed"),
        (status = 409, description = "Username or email already exists")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_register",
    skip(payload, service),
    fields(username = %payload.user_name)
)]
pub async fn register(
    payload: web::Json<RegisterReqDto>,
    service: web::Data<AuthService>,
) -> AppResult<HttpResponse> {
    info!("Registration request received");
    payload.validate()?;

    let user = service.register(&payload).await?;

    Ok(HttpResponse::Ok().json(RegisterResponse {
        message: "User registered successfully".to_string(),
        user,
    }))
}

/// Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Login successful", body = LoginEnvelope),
        (status = 401, description = "Invalid username or password")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(payload, service),
    fields(username = %payload.user_name)
)]
pub async fn login(
    payload: web::Json<LoginReqDto>,
    service: web::Data<AuthService>,
) -> AppResult<HttpResponse> {
    info!("Login request received");
    payload.validate()?;

    let session = service
        .login(&payload)
        .await?
        .ok_or_else(|| AppError::unauthorized(UnauthorizedReason::BadCredentials))?;

    info!(user_id = session.user_id, "Login successful");
    Ok(HttpResponse::Ok().json(LoginEnvelope {
        message: "Login successful".to_string(),
        data: session,
    }))
}

/// Liveness check for the auth endpoints
#[utoipa::path(
    get,
    path = "/api/auth/test",
    responses(
        (status = 200, description = "Auth controller is up", body = Object, example = json!({
            "message": "Auth controller is working!",
            "timestamp": "2024-01-01T00:00:00Z"
        }))
    ),
    tag = "Auth"
)]
pub async fn test() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Auth controller is working!",
        "timestamp": Utc::now(),
    }))
}
