use std::net::SocketAddr;
use std::time::Instant;

use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Logs method, path, query, status, client address and latency for every
/// request.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().unwrap_or("").to_string();
    let client_ip = req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0.to_string())
        .unwrap_or_else(|| "-".to_string());

    let response = next.run(req).await;

    log::info!(
        "method: {}, path: {}, query: {}, status: {}, client_ip: {}, latency: {:?}",
        method,
        path,
        query,
        response.status(),
        client_ip,
        start.elapsed(),
    );

    response
}
