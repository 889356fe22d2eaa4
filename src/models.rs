use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Deserialize, Validate, ToSchema)]
pub struct RegisterReqDto {
    #[serde(rename = "userName", default)]
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "alice")]
    pub user_name: String,
    #[serde(rename = "emailID", default)]
    #[validate(length(min = 1, max = 255), email)]
    #[schema(example = "alice@x.com")]
    pub email_id: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 128))]
    #[schema(example = "pw123")]
    pub password: String,
    #[serde(default)]
    #[schema(example = json!(["Manager"]))]
    pub roles: Vec<String>,
}

#[derive(Deserialize, Validate, ToSchema)]
pub struct LoginReqDto {
    #[serde(rename = "userName", default)]
    #[validate(length(min = 1))]
    #[schema(example = "alice")]
    pub user_name: String,
    #[serde(default)]
    #[validate(length(min = 1))]
    #[schema(example = "pw123")]
    pub password: String,
}

/// Public identity of a user; never carries password material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    #[serde(rename = "userID")]
    pub user_id: u64,
    #[serde(rename = "userName")]
    pub user_name: String,
    #[serde(rename = "emailID")]
    pub email_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    #[serde(rename = "jwtToken")]
    pub jwt_token: String,
    #[serde(rename = "userID")]
    pub user_id: u64,
    #[serde(rename = "userName")]
    pub user_name: String,
    #[serde(rename = "emailID")]
    pub email_id: String,
    pub roles: Vec<String>,
}

#[derive(Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserDto,
}

#[derive(Serialize, ToSchema)]
pub struct LoginEnvelope {
    pub message: String,
    pub data: LoginResponse,
}

/// Bearer token payload. `sub` holds the user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
    #[serde(rename = "role", default)]
    pub roles: Vec<String>,
}
