//! Request-level middleware: request id propagation and request metrics.

use std::time::Instant;

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, Request},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Assigns each request an `X-Request-Id` and mirrors it on the response.
///
/// An id supplied by the caller is kept; otherwise a fresh UUID is
/// generated. The value is also stored in the request extensions so the
/// trace span can pick it up.
pub async fn request_id(mut req: Request<Body>, next: Next) -> Response {
    let header_name = HeaderName::from_static("x-request-id");

    let id = match req.headers().get(&header_name) {
        Some(value) => value.clone(),
        None => {
            let generated = Uuid::new_v4().to_string();
            // A UUID is always a valid header value.
            HeaderValue::from_str(&generated).unwrap_or(HeaderValue::from_static("invalid"))
        }
    };

    req.extensions_mut().insert(id.clone());

    let mut response = next.run(req).await;
    response.headers_mut().insert(header_name, id);
    response
}

/// Records a counter and latency histogram for every handled request.
pub async fn track_requests(req: Request<Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    crate::metrics::record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        started.elapsed(),
    );
    response
}
