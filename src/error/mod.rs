pub mod app_error;
pub mod envelope;
pub mod kind;
pub mod translator;

pub use app_error::{AppError, AppResult, InvalidOperation, UnauthorizedReason};
pub use translator::error_translator;
