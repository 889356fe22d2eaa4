use actix_web::{HttpRequest, HttpResponse, http::header::LOCATION};
use serde::Serialize;

pub mod departments;
pub mod employees;
pub mod roles;
pub mod user_roles;
pub mod users;

/// 201 with a `Location` pointing at the new resource under the request path.
fn created<T: Serialize>(req: &HttpRequest, id: u64, body: &T) -> HttpResponse {
    let location = format!("{}/{}", req.path().trim_end_matches('/'), id);
    HttpResponse::Created()
        .insert_header((LOCATION, location))
        .json(body)
}

fn default_true() -> bool {
    true
}
