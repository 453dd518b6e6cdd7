use std::time::Instant;

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

pub async fn log_http_request(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let host = req
        .headers()
        .get("host")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
        .to_string();
    let started = Instant::now();
    let response = next.run(req).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if status.is_server_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            host = %host,
            status = %status,
            elapsed_ms,
            "http request"
        );
    } else {
        tracing::info!(
            method = %method,
            uri = %uri,
            host = %host,
            status = %status,
            elapsed_ms,
            "http request"
        );
    }
    response
}
