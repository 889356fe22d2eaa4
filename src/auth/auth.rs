use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

use crate::error::{AppError, UnauthorizedReason};
use crate::models::Claims;

/// Caller identity, placed in request extensions by the bearer gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: u64,
    pub username: String,
    pub roles: Vec<String>,
}

impl AuthUser {
    pub fn from_claims(claims: Claims) -> Result<Self, AppError> {
        let user_id = claims
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized(UnauthorizedReason::InvalidToken))?;

        Ok(AuthUser {
            user_id,
            username: claims.name,
            roles: claims.roles,
        })
    }
}

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or_else(|| AppError::unauthorized(UnauthorizedReason::MissingToken)),
        )
    }
}
