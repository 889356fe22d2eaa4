use actix_web::http::StatusCode;
use strum_macros::AsRefStr;

/// Fixed classification every failure is sorted into before it reaches the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Duplicate,
    Unauthorized,
    Forbidden,
    RateLimited,
    Database,
    InvalidOperation,
    MissingArgument,
    MalformedArgument,
    Unclassified,
}

impl ErrorKind {
    pub const fn status_code(&self) -> StatusCode {
        match self {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Validation
            | ErrorKind::InvalidOperation
            | ErrorKind::MissingArgument
            | ErrorKind::MalformedArgument => StatusCode::BAD_REQUEST,
            ErrorKind::Duplicate => StatusCode::CONFLICT,
            ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ErrorKind::Database | ErrorKind::Unclassified => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub const fn title(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => "Not Found",
            ErrorKind::Validation => "Invalid Information",
            ErrorKind::Duplicate => "Already Exists",
            ErrorKind::Unauthorized | ErrorKind::Forbidden => "Access Denied",
            ErrorKind::RateLimited => "Too Many Requests",
            ErrorKind::Database => "Service Temporarily Unavailable",
            ErrorKind::InvalidOperation => "Action Not Allowed",
            ErrorKind::MissingArgument => "Missing Information",
            ErrorKind::MalformedArgument => "Invalid Input",
            ErrorKind::Unclassified => "Something Went Wrong",
        }
    }

    pub const fn suggestion(&self) -> &'static str {
        match self {
            ErrorKind::NotFound => {
                "Please check the ID and try again, or contact support if the problem persists."
            }
            ErrorKind::Validation => {
                "Please check your input and make sure all required fields are filled correctly."
            }
            ErrorKind::Duplicate => {
                "Please use a different value or update the existing record instead."
            }
            ErrorKind::Unauthorized => {
                "Please log in with valid credentials or contact your administrator for access."
            }
            ErrorKind::Forbidden => "Please contact your administrator if you need access.",
            ErrorKind::RateLimited => "Please wait a moment before trying again.",
            ErrorKind::Database => {
                "Please wait a few moments and try again. If the problem continues, contact support."
            }
            ErrorKind::InvalidOperation => "Please verify your request and try again.",
            ErrorKind::MissingArgument => "Please fill in all required fields and try again.",
            ErrorKind::MalformedArgument => "Please check your input and try again.",
            ErrorKind::Unclassified => {
                "Please try again later. If the problem persists, contact our support team."
            }
        }
    }

    /// 5xx kinds are logged at error level with full detail.
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}
