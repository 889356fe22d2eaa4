use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::auth::jwt::TokenIssuer;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::model::{user::NewUser, user_role::NewUserRole};
use crate::models::{LoginReqDto, LoginResponse, RegisterReqDto, UserDto};
use crate::repository::AuthRepository;

pub struct AuthService {
    repo: Arc<dyn AuthRepository>,
    issuer: TokenIssuer,
}

impl AuthService {
    pub fn new(repo: Arc<dyn AuthRepository>, issuer: TokenIssuer) -> Self {
        Self { repo, issuer }
    }

    /// `Ok(None)` when the user is unknown, inactive or the password does
    /// not match.
    pub async fn login(&self, request: &LoginReqDto) -> AppResult<Option<LoginResponse>> {
        let Some(user) = self.repo.find_active_by_username(&request.user_name).await? else {
            info!("Login rejected: no active user with that username");
            return Ok(None);
        };

        if !verify_password(&request.password, &user.password_hash, &user.password_salt) {
            info!(user_id = user.id, "Login rejected: password mismatch");
            return Ok(None);
        }

        let roles = self.repo.active_role_names(user.id).await?;
        let jwt_token = self.issuer.issue(user.id, &user.username, &roles)?;
        debug!(user_id = user.id, ?roles, "Token issued");

        Ok(Some(LoginResponse {
            jwt_token,
            user_id: user.id,
            user_name: user.username,
            email_id: user.email,
            roles,
        }))
    }

    /// User insert and role links are separate writes; a failure in between
    /// leaves the user without roles.
    pub async fn register(&self, request: &RegisterReqDto) -> AppResult<UserDto> {
        if self.repo.username_exists(&request.user_name).await? {
            warn!("Registration rejected: username taken");
            return Err(AppError::duplicate("User", "UserName", &request.user_name));
        }
        if self.repo.email_exists(&request.email_id).await? {
            warn!("Registration rejected: email taken");
            return Err(AppError::duplicate("User", "EmailID", &request.email_id));
        }

        let hash = hash_password(&request.password);
        let user = self
            .repo
            .create_user(NewUser {
                username: request.user_name.clone(),
                email: request.email_id.clone(),
                password_hash: hash.digest,
                password_salt: hash.salt,
                is_active: true,
                created_by: None,
            })
            .await?;

        if !request.roles.is_empty() {
            let roles = self.repo.roles_by_names(&request.roles).await?;
            if roles.len() < request.roles.len() {
                debug!(requested = ?request.roles, "Some role names did not match a role");
            }
            for role in roles {
                self.repo
                    .add_user_role(NewUserRole {
                        user_id: user.id,
                        role_id: role.id,
                        is_active: true,
                        created_by: None,
                    })
                    .await?;
            }
        }

        info!(user_id = user.id, "User registered");
        Ok(UserDto {
            user_id: user.id,
            user_name: user.username,
            email_id: user.email,
        })
    }
}
