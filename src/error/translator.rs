use std::fmt;

use actix_web::{
    Error, HttpMessage, HttpRequest, HttpResponse,
    body::{BoxBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    error::{InternalError, JsonPayloadError, PathError, QueryPayloadError},
    http::{
        StatusCode,
        header::{HeaderMap, HeaderName, HeaderValue},
    },
    middleware::Next,
};
use tracing::{Instrument, error, info_span, warn};
use uuid::Uuid;

use super::app_error::{AppError, FieldViolation, UnauthorizedReason, ViolationRule};
use super::envelope;

pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Correlates a request's log lines with the error envelope it produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceId(String);

impl TraceId {
    pub fn new() -> Self {
        TraceId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Single interception point for every request: assigns the trace id and
/// turns any failure, whether returned by a handler, an extractor or an inner
/// middleware, into the JSON error envelope.
pub async fn error_translator(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let trace_id = TraceId::new();
    req.extensions_mut().insert(trace_id.clone());

    // Routing needs the only handle on the request: keep no clone across `next.call`.
    let path = req.path().to_owned();
    let span = info_span!(
        "request",
        trace_id = %trace_id,
        method = %req.method(),
        path = %path
    );

    match next.call(req).instrument(span).await {
        Ok(res) => {
            let mut res = match res.response().error() {
                Some(err) => {
                    let response = translate(err, &path, &trace_id);
                    res.into_response(response)
                }
                None => res.map_into_boxed_body(),
            };
            stamp_trace_id(res.headers_mut(), &trace_id);
            Ok(res)
        }
        // Inner middleware (rate limiter) failures: the rendered envelope
        // travels inside the error and the server writes it out unchanged.
        Err(err) => {
            let mut response = translate(&err, &path, &trace_id);
            stamp_trace_id(response.headers_mut(), &trace_id);
            Err(InternalError::from_response(err, response).into())
        }
    }
}

fn stamp_trace_id(headers: &mut HeaderMap, trace_id: &TraceId) {
    if let Ok(value) = HeaderValue::from_str(trace_id.as_str()) {
        headers.insert(HeaderName::from_static(TRACE_ID_HEADER), value);
    }
}

fn translate(err: &Error, path: &str, trace_id: &TraceId) -> HttpResponse {
    let classified;
    let app_err = match err.as_error::<AppError>() {
        Some(app_err) => app_err,
        None => {
            classified = classify(err);
            &classified
        }
    };
    log_error(app_err, path, trace_id);
    envelope::render(app_err, trace_id.as_str())
}

fn log_error(err: &AppError, path: &str, trace_id: &TraceId) {
    let kind = err.kind();
    if kind.is_server_error() {
        error!(
            trace_id = %trace_id,
            kind = kind.as_ref(),
            path,
            error = %err,
            "Request failed"
        );
    } else {
        warn!(
            trace_id = %trace_id,
            kind = kind.as_ref(),
            path,
            error = %err,
            "Request rejected"
        );
    }
}

/// Sorts framework errors (extractor rejections, rate limiter, ...) into the taxonomy.
pub fn classify(err: &Error) -> AppError {
    if let Some(json_err) = err.as_error::<JsonPayloadError>() {
        return from_json_error(json_err);
    }
    if let Some(path_err) = err.as_error::<PathError>() {
        return AppError::malformed(path_err.to_string());
    }
    if let Some(query_err) = err.as_error::<QueryPayloadError>() {
        return AppError::malformed(query_err.to_string());
    }

    let status = err.as_response_error().status_code();
    match status {
        StatusCode::NOT_FOUND => AppError::not_found("Resource", ""),
        StatusCode::UNAUTHORIZED => AppError::unauthorized(UnauthorizedReason::MissingToken),
        StatusCode::FORBIDDEN => AppError::Forbidden,
        StatusCode::TOO_MANY_REQUESTS => AppError::RateLimited,
        s if s.is_client_error() => AppError::malformed(err.to_string()),
        _ => AppError::Unclassified {
            detail: err.to_string(),
        },
    }
}

pub fn from_json_error(err: &JsonPayloadError) -> AppError {
    match err {
        JsonPayloadError::Deserialize(inner) if inner.is_eof() => AppError::missing("request body"),
        JsonPayloadError::Deserialize(inner) => match missing_field(inner) {
            Some(field) => AppError::Validation {
                violations: vec![FieldViolation::new(field, ViolationRule::Required)],
            },
            None => AppError::malformed(inner.to_string()),
        },
        other => AppError::malformed(other.to_string()),
    }
}

/// serde reports an absent required field only through its message:
/// "missing field `dateOfBirth` at line 1 column 42".
fn missing_field(err: &serde_json::Error) -> Option<String> {
    if !err.is_data() {
        return None;
    }
    let message = err.to_string();
    let rest = message.strip_prefix("missing field `")?;
    rest.split('`').next().map(str::to_string)
}

/// Handler for `web::JsonConfig::error_handler`.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    from_json_error(&err).into()
}

/// Handler for `web::PathConfig::error_handler`.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> Error {
    AppError::malformed(err.to_string()).into()
}

/// Fallback for requests no route matched.
pub async fn route_not_found(req: HttpRequest) -> Result<HttpResponse, AppError> {
    Err(AppError::not_found("Resource", req.path()))
}
