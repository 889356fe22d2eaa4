use actix_web::{
    Error, HttpMessage,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::header::AUTHORIZATION,
    middleware::Next,
    web::Data,
};
use tracing::debug;

use crate::auth::auth::AuthUser;
use crate::auth::jwt::TokenIssuer;
use crate::error::{AppError, AppResult, UnauthorizedReason};

/// Bearer gate for the protected scope. Rejections come back as an `Ok`
/// response carrying the `AppError`, which the translator renders.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    match authenticate(&req) {
        Ok(auth_user) => {
            debug!(user_id = auth_user.user_id, "Bearer token accepted");
            req.extensions_mut().insert(auth_user);
            next.call(req).await.map(ServiceResponse::map_into_left_body)
        }
        Err(err) => Ok(req.error_response(err).map_into_right_body()),
    }
}

fn authenticate(req: &ServiceRequest) -> AppResult<AuthUser> {
    let issuer = req
        .app_data::<Data<TokenIssuer>>()
        .ok_or_else(|| AppError::Unclassified {
            detail: "token issuer is not registered as app data".to_string(),
        })?;

    let token =
        bearer_token(req).ok_or_else(|| AppError::unauthorized(UnauthorizedReason::MissingToken))?;

    let claims = issuer.verify(token)?;
    AuthUser::from_claims(claims)
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
