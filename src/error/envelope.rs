use std::collections::BTreeMap;

use actix_web::HttpResponse;
use serde::Serialize;

use super::app_error::{AppError, FieldViolation, InvalidOperation, UnauthorizedReason, ViolationRule};

/// JSON body of every failed request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub title: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<&'static str>,
    pub trace_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ErrorResponse {
    pub fn from_error(err: &AppError, trace_id: &str) -> Self {
        let kind = err.kind();
        let (title, message, suggestion) = match err {
            AppError::NotFound { resource, .. } => (
                kind.title(),
                format!(
                    "We couldn't find the {} you're looking for. It may have been removed or the ID might be incorrect.",
                    format_resource_name(resource)
                ),
                kind.suggestion(),
            ),
            AppError::Validation { .. } => (
                kind.title(),
                "Some of the information you provided is not valid. Please review and correct the highlighted fields.".to_string(),
                kind.suggestion(),
            ),
            AppError::Duplicate {
                resource, field, ..
            } => {
                let resource = format_resource_name(resource);
                let field = format_field_name(field);
                (
                    kind.title(),
                    format!(
                        "A {resource} with this {field} already exists. Each {resource} must have a unique {field}."
                    ),
                    kind.suggestion(),
                )
            }
            AppError::Unauthorized { reason } => unauthorized_copy(*reason),
            AppError::Forbidden => (
                kind.title(),
                "You don't have permission to access this resource.".to_string(),
                kind.suggestion(),
            ),
            AppError::RateLimited => (
                kind.title(),
                "You're sending requests too quickly.".to_string(),
                kind.suggestion(),
            ),
            AppError::Database { .. } => (
                kind.title(),
                "We're having trouble processing your request right now. Our team has been notified.".to_string(),
                kind.suggestion(),
            ),
            AppError::InvalidOperation(op) => (
                kind.title(),
                match op {
                    InvalidOperation::AuthConfiguration => "There's a configuration issue with the authentication system. Please contact the administrator.".to_string(),
                },
                kind.suggestion(),
            ),
            AppError::MissingArgument { name } => (
                kind.title(),
                format!(
                    "The {} is missing. Please provide this information to continue.",
                    format_field_name(name)
                ),
                kind.suggestion(),
            ),
            AppError::MalformedArgument { .. } => (
                kind.title(),
                "The information you provided is not in the correct format.".to_string(),
                kind.suggestion(),
            ),
            AppError::Unclassified { .. } => (
                kind.title(),
                "We encountered an unexpected issue while processing your request. Our team has been notified and is working on it.".to_string(),
                kind.suggestion(),
            ),
        };

        let field_errors = match err {
            AppError::Validation { violations } => Some(field_errors(violations)),
            _ => None,
        };

        Self {
            success: false,
            title,
            message,
            suggestion: Some(suggestion),
            trace_id: trace_id.to_string(),
            field_errors,
        }
    }
}

/// Builds the full HTTP response for an error.
pub fn render(err: &AppError, trace_id: &str) -> HttpResponse {
    let mut builder = HttpResponse::build(err.kind().status_code());
    if let AppError::Unauthorized {
        reason: UnauthorizedReason::ExpiredToken,
    } = err
    {
        builder.insert_header(("Token-Expired", "true"));
    }
    builder.json(ErrorResponse::from_error(err, trace_id))
}

fn unauthorized_copy(reason: UnauthorizedReason) -> (&'static str, String, &'static str) {
    let (title, message, suggestion) = match reason {
        UnauthorizedReason::BadCredentials => (
            "Access Denied",
            "The username or password you entered is incorrect. Please check your credentials and try again.",
            "Please log in with valid credentials or contact your administrator for access.",
        ),
        UnauthorizedReason::MissingToken => (
            "Authentication Required",
            "You need to log in to access this resource.",
            "Please provide a valid authentication token.",
        ),
        UnauthorizedReason::ExpiredToken => (
            "Authentication Required",
            "Your session has expired.",
            "Please log in again to continue.",
        ),
        UnauthorizedReason::InvalidToken => (
            "Authentication Required",
            "Your authentication token is invalid.",
            "Please log in again to get a new token.",
        ),
    };
    (title, message.to_string(), suggestion)
}

fn field_errors(violations: &[FieldViolation]) -> BTreeMap<String, Vec<String>> {
    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for violation in violations {
        let field = format_field_name(&violation.field);
        let message = violation_message(&field, &violation.rule);
        map.entry(field).or_default().push(message);
    }
    map
}

fn violation_message(field: &str, rule: &ViolationRule) -> String {
    match rule {
        ViolationRule::Required => format!("Please enter your {field}."),
        ViolationRule::InvalidEmail => {
            "Please enter a valid email address (e.g., name@example.com).".to_string()
        }
        ViolationRule::TooShort => {
            format!("Your {field} is too short. Please enter more characters.")
        }
        ViolationRule::TooLong => format!("Your {field} is too long. Please shorten it."),
        ViolationRule::InvalidFormat => {
            format!("The {field} format is not correct. Please check and try again.")
        }
        ViolationRule::Other(message) => message.clone(),
    }
}

/// "Departments" -> "department", "UserRole" -> "user role".
pub fn format_resource_name(resource: &str) -> String {
    if resource.is_empty() {
        return "record".to_string();
    }
    humanize(resource.strip_suffix('s').unwrap_or(resource))
}

/// "EmailID" -> "email id", "first_name" -> "first name".
pub fn format_field_name(field: &str) -> String {
    if field.is_empty() {
        return "field".to_string();
    }
    humanize(field)
}

/// Splits camel, Pascal and snake case into lower-cased words. Runs of
/// capitals stay together ("userID" -> "user id").
fn humanize(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !out.ends_with(' ') && !out.is_empty() {
                out.push(' ');
            }
            continue;
        }
        if c.is_uppercase() && i > 0 && !out.ends_with(' ') {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                out.push(' ');
            }
        }
        out.extend(c.to_lowercase());
    }

    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, http::StatusCode};

    #[test]
    fn test_format_field_name() {
        assert_eq!(format_field_name("EmailID"), "email id");
        assert_eq!(format_field_name("userName"), "user name");
        assert_eq!(format_field_name("first_name"), "first name");
        assert_eq!(format_field_name("IDNumber"), "id number");
        assert_eq!(format_field_name(""), "field");
    }

    #[test]
    fn test_format_resource_name() {
        assert_eq!(format_resource_name("Departments"), "department");
        assert_eq!(format_resource_name("UserRole"), "user role");
        assert_eq!(format_resource_name("Employee"), "employee");
        assert_eq!(format_resource_name(""), "record");
    }

    #[test]
    fn test_not_found_copy() {
        let body = ErrorResponse::from_error(&AppError::not_found("Department", 42), "t-1");
        assert!(!body.success);
        assert_eq!(body.title, "Not Found");
        assert_eq!(
            body.message,
            "We couldn't find the department you're looking for. It may have been removed or the ID might be incorrect."
        );
        assert_eq!(body.trace_id, "t-1");
        assert!(body.field_errors.is_none());
    }

    #[test]
    fn test_duplicate_copy() {
        let body = ErrorResponse::from_error(&AppError::duplicate("User", "EmailID", "a@x.com"), "t");
        assert_eq!(body.title, "Already Exists");
        assert_eq!(
            body.message,
            "A user with this email id already exists. Each user must have a unique email id."
        );
    }

    #[test]
    fn test_validation_field_errors() {
        let err = AppError::Validation {
            violations: vec![
                FieldViolation::new("user_name", ViolationRule::Required),
                FieldViolation::new("email_id", ViolationRule::InvalidEmail),
                FieldViolation::new("password", ViolationRule::TooShort),
            ],
        };
        let body = ErrorResponse::from_error(&err, "t");
        let fields = body.field_errors.unwrap();

        assert_eq!(fields["user name"], vec!["Please enter your user name."]);
        assert_eq!(
            fields["email id"],
            vec!["Please enter a valid email address (e.g., name@example.com)."]
        );
        assert_eq!(
            fields["password"],
            vec!["Your password is too short. Please enter more characters."]
        );
    }

    #[test]
    fn test_database_error_hides_detail() {
        let err = AppError::database("GetAllUsers")(sqlx::Error::Protocol(
            "secret connection detail".into(),
        ));
        let json = serde_json::to_string(&ErrorResponse::from_error(&err, "t")).unwrap();

        assert!(!json.contains("secret"));
        assert!(!json.contains("GetAllUsers"));
        assert!(json.contains("\"title\":\"Service Temporarily Unavailable\""));
    }

    #[test]
    fn test_serialization_is_camel_case_without_nulls() {
        let json = serde_json::to_value(ErrorResponse::from_error(
            &AppError::not_found("Role", 1),
            "abc",
        ))
        .unwrap();

        assert_eq!(json["success"], false);
        assert_eq!(json["traceId"], "abc");
        assert!(json.get("fieldErrors").is_none());
        assert!(json.get("trace_id").is_none());
    }

    #[actix_web::test]
    async fn test_render_expired_token_sets_header() {
        let err = AppError::unauthorized(UnauthorizedReason::ExpiredToken);
        let response = render(&err, "t");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers().get("Token-Expired").unwrap(), "true");

        let bytes = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["title"], "Authentication Required");
        assert_eq!(json["message"], "Your session has expired.");
    }
}
