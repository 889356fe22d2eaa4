use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use tracing::error;
use validator::{ValidationError, ValidationErrors};

use super::envelope;
use super::kind::ErrorKind;

pub type AppResult<T> = Result<T, AppError>;

/// What a single field failed on. Carried from the point of validation so the
/// envelope can pick its copy by table lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationRule {
    Required,
    InvalidEmail,
    TooShort,
    TooLong,
    InvalidFormat,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub rule: ViolationRule,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, rule: ViolationRule) -> Self {
        Self {
            field: field.into(),
            rule,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum UnauthorizedReason {
    #[display(fmt = "invalid username or password")]
    BadCredentials,
    #[display(fmt = "missing bearer token")]
    MissingToken,
    #[display(fmt = "token expired")]
    ExpiredToken,
    #[display(fmt = "invalid token")]
    InvalidToken,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum InvalidOperation {
    #[display(fmt = "JWT configuration is missing")]
    AuthConfiguration,
}

/// Every failure a request can end in. Variants carry the structured facts
/// (resource, field, id, operation) the client-facing copy is built from.
#[derive(Debug, Display)]
pub enum AppError {
    #[display(fmt = "{} with ID '{}' was not found", resource, id)]
    NotFound { resource: &'static str, id: String },

    #[display(fmt = "one or more validation errors occurred")]
    Validation { violations: Vec<FieldViolation> },

    #[display(fmt = "{} with {} '{}' already exists", resource, field, value)]
    Duplicate {
        resource: &'static str,
        field: &'static str,
        value: String,
    },

    #[display(fmt = "unauthorized: {}", reason)]
    Unauthorized { reason: UnauthorizedReason },

    #[display(fmt = "forbidden")]
    Forbidden,

    #[display(fmt = "rate limit exceeded")]
    RateLimited,

    #[display(fmt = "database operation '{}' failed: {}", operation, source)]
    Database {
        operation: &'static str,
        source: sqlx::Error,
    },

    #[display(fmt = "invalid operation: {}", _0)]
    InvalidOperation(InvalidOperation),

    #[display(fmt = "missing argument: {}", name)]
    MissingArgument { name: String },

    #[display(fmt = "malformed argument: {}", detail)]
    MalformedArgument { detail: String },

    #[display(fmt = "unhandled error: {}", detail)]
    Unclassified { detail: String },
}

impl AppError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        AppError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn duplicate(resource: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        AppError::Duplicate {
            resource,
            field,
            value: value.into(),
        }
    }

    pub fn unauthorized(reason: UnauthorizedReason) -> Self {
        AppError::Unauthorized { reason }
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        AppError::MalformedArgument {
            detail: detail.into(),
        }
    }

    pub fn missing(name: impl Into<String>) -> Self {
        AppError::MissingArgument { name: name.into() }
    }

    /// Wraps a storage failure with the name of the repository operation.
    ///
    /// ```ignore
    /// sqlx::query("...").execute(&pool).await.map_err(AppError::database("DeleteRole"))?;
    /// ```
    pub fn database(operation: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
        move |source| {
            error!(operation, error = %source, "Database operation failed");
            AppError::Database { operation, source }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotFound { .. } => ErrorKind::NotFound,
            AppError::Validation { .. } => ErrorKind::Validation,
            AppError::Duplicate { .. } => ErrorKind::Duplicate,
            AppError::Unauthorized { .. } => ErrorKind::Unauthorized,
            AppError::Forbidden => ErrorKind::Forbidden,
            AppError::RateLimited => ErrorKind::RateLimited,
            AppError::Database { .. } => ErrorKind::Database,
            AppError::InvalidOperation(_) => ErrorKind::InvalidOperation,
            AppError::MissingArgument { .. } => ErrorKind::MissingArgument,
            AppError::MalformedArgument { .. } => ErrorKind::MalformedArgument,
            AppError::Unclassified { .. } => ErrorKind::Unclassified,
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Database { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }

    // The translator middleware re-renders with the request's trace id; this
    // only runs bare when the error escapes outside of it.
    fn error_response(&self) -> HttpResponse {
        envelope::render(self, "")
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut violations: Vec<FieldViolation> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter()
                    .map(move |err| FieldViolation::new(field.to_string(), rule_for(err)))
            })
            .collect();
        violations.sort_by(|a, b| a.field.cmp(&b.field));

        AppError::Validation { violations }
    }
}

/// Picks the rule from the validator's code and params, never its message.
fn rule_for(err: &ValidationError) -> ViolationRule {
    match err.code.as_ref() {
        "required" => ViolationRule::Required,
        "email" => ViolationRule::InvalidEmail,
        "length" => length_rule(err),
        "regex" | "url" | "range" => ViolationRule::InvalidFormat,
        other => ViolationRule::Other(
            err.message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| other.to_string()),
        ),
    }
}

fn length_rule(err: &ValidationError) -> ViolationRule {
    let len = err
        .params
        .get("value")
        .and_then(|v| v.as_str())
        .map(|s| s.chars().count() as u64);
    let min = err.params.get("min").and_then(|v| v.as_u64());
    let max = err.params.get("max").and_then(|v| v.as_u64());

    match (len, min, max) {
        (Some(0), Some(_), _) => ViolationRule::Required,
        (Some(len), Some(min), _) if len < min => ViolationRule::TooShort,
        (Some(len), _, Some(max)) if len > max => ViolationRule::TooLong,
        _ => ViolationRule::InvalidFormat,
    }
}
