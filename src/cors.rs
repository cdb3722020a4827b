//! Permissive CORS for the browser front end.

use actix_web::http::header;
use actix_web::middleware::DefaultHeaders;
use actix_web::HttpResponse;

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

/// Headers attached to every response
pub fn headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::ACCESS_CONTROL_ALLOW_ORIGIN, ALLOW_ORIGIN))
        .add((header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOW_HEADERS))
}

/// Answer a preflight request, the CORS headers come from [`headers`]
#[tracing::instrument(name = "CORS preflight")]
pub async fn preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}
