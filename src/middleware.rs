use axum::{
    extract::Request,
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

const POWERED_BY: &str = "notes-server";
const CONTENT_SECURITY_POLICY: &str = "default-src *; script-src * 'unsafe-inline' 'unsafe-eval' https://cdn.jsdelivr.net; script-src-elem, 'self'; object-src *; frame-ancestors *;";
const CONTENT_SECURITY_POLICY_REPORT_ONLY: &str =
    "default-src * data: blob:; script-src * 'unsafe-inline' 'unsafe-eval';";
const ALLOWED_METHODS: &str = "DELETE, GET, HEAD, OPTIONS, PATCH, POST, PUT";
const PREFLIGHT_MAX_AGE: &str = "600";

/// Logs every inbound request with its full header map.
pub async fn log_request(req: Request, next: Next) -> Response {
    tracing::debug!(
        method = %req.method(),
        uri = %req.uri(),
        headers = ?req.headers(),
        "incoming request"
    );
    next.run(req).await
}

/// Fixed headers stamped on every response.
pub async fn response_headers(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();
    headers.insert("x-powered-by", HeaderValue::from_static(POWERED_BY));
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CONTENT_SECURITY_POLICY),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY_REPORT_ONLY,
        HeaderValue::from_static(CONTENT_SECURITY_POLICY_REPORT_ONLY),
    );
    headers.insert("httponly", HeaderValue::from_static("True"));
    response
}

/// Any origin, with credentials. The request's `Origin` is echoed back and
/// preflights are answered without reaching a handler.
pub async fn cors(req: Request, next: Next) -> Response {
    let origin = req.headers().get(header::ORIGIN).cloned();
    let preflight = req.method() == Method::OPTIONS
        && req
            .headers()
            .contains_key(header::ACCESS_CONTROL_REQUEST_METHOD);

    let mut response = if preflight {
        let mut response = StatusCode::OK.into_response();
        let headers = response.headers_mut();
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        if let Some(requested) = req.headers().get(header::ACCESS_CONTROL_REQUEST_HEADERS) {
            headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, requested.clone());
        }
        headers.insert(
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(PREFLIGHT_MAX_AGE),
        );
        response
    } else {
        next.run(req).await
    };

    if let Some(origin) = origin {
        let headers = response.headers_mut();
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        headers.append(header::VARY, HeaderValue::from_static("Origin"));
    }
    response
}
