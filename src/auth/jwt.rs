use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind as JwtErrorKind,
};
use tracing::{debug, error};
use uuid::Uuid;

use crate::{
    config::JwtSettings,
    error::{AppError, AppResult, InvalidOperation, UnauthorizedReason},
    models::Claims,
};

struct SigningParams<'a> {
    key: &'a str,
    issuer: &'a str,
    audience: &'a str,
}

/// Issues and verifies HS256 bearer tokens. Loaded once at startup and shared.
#[derive(Clone)]
pub struct TokenIssuer {
    settings: JwtSettings,
}

impl TokenIssuer {
    pub fn new(settings: JwtSettings) -> Self {
        Self { settings }
    }

    fn params(&self) -> AppResult<SigningParams<'_>> {
        match (
            self.settings.key.as_deref(),
            self.settings.issuer.as_deref(),
            self.settings.audience.as_deref(),
        ) {
            (Some(key), Some(issuer), Some(audience)) => Ok(SigningParams {
                key,
                issuer,
                audience,
            }),
            _ => {
                error!("JWT key, issuer or audience is not configured");
                Err(AppError::InvalidOperation(
                    InvalidOperation::AuthConfiguration,
                ))
            }
        }
    }

    pub fn issue(&self, user_id: u64, user_name: &str, roles: &[String]) -> AppResult<String> {
        self.issue_at(user_id, user_name, roles, Utc::now())
    }

    fn issue_at(
        &self,
        user_id: u64,
        user_name: &str,
        roles: &[String],
        issued_at: DateTime<Utc>,
    ) -> AppResult<String> {
        let params = self.params()?;

        let claims = Claims {
            sub: user_id.to_string(),
            name: user_name.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::hours(self.settings.ttl_hours)).timestamp(),
            iss: params.issuer.to_string(),
            aud: params.audience.to_string(),
            roles: roles.to_vec(),
        };

        debug!(user_id, jti = %claims.jti, "Issuing token");

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(params.key.as_bytes()),
        )
        .map_err(|e| AppError::Unclassified {
            detail: format!("token signing failed: {e}"),
        })
    }

    /// Checks signature, issuer, audience and expiry before returning any claim.
    pub fn verify(&self, token: &str) -> AppResult<Claims> {
        let params = self.params()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[params.issuer]);
        validation.set_audience(&[params.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(params.key.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            JwtErrorKind::ExpiredSignature => {
                AppError::unauthorized(UnauthorizedReason::ExpiredToken)
            }
            _ => {
                debug!(error = %e, "Rejected bearer token");
                AppError::unauthorized(UnauthorizedReason::InvalidToken)
            }
        })
    }
}
