//! Request correlation IDs.
//!
//! Every dispatch request gets an ID that ties together the `http_request`
//! span opened in [`crate::app`], any Sentry event raised while serving it,
//! and the response the operator's browser receives.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

/// Header carrying the request ID in both directions.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Fill the `request_id` field of the `http_request` span.
///
/// A non-empty incoming `x-request-id` is kept so a fronting proxy's ID
/// survives; otherwise a fresh UUID v4 is used. The ID is echoed back on
/// every response, error pages included.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = incoming_id(&request).map_or_else(|| Uuid::new_v4().to_string(), String::from);

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| scope.set_tag("request_id", &request_id));

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

fn incoming_id(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
}
