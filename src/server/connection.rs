// Connection handling module
// Serves one TCP connection and bridges hyper requests into the dispatcher

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::ServerState;
use crate::http::ApiRequest;
use crate::logger::{self, AccessLogEntry};

/// Handle a single connection in a spawned task.
///
/// The connection is served over HTTP/1.1 with keep-alive and dropped once
/// `server.request_timeout` elapses.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<ServerState>,
) {
    let state = Arc::clone(state);
    let timeout_duration = Duration::from_secs(state.config.server.request_timeout);

    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let mut builder = http1::Builder::new();
        builder.keep_alive(true);

        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&state);
                async move { Ok::<_, Infallible>(serve_request(req, peer_addr, &state).await) }
            }),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => logger::log_warning(&format!(
                "Connection from {peer_addr} timed out after {} seconds",
                timeout_duration.as_secs()
            )),
        }
    });
}

/// Convert, dispatch, log and convert back
pub async fn serve_request<B>(
    req: Request<B>,
    peer_addr: SocketAddr,
    state: &ServerState,
) -> Response<Full<Bytes>>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let started = Instant::now();
    let mut entry = AccessLogEntry::new(
        peer_addr.to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };
    entry.referer = header("referer");
    entry.user_agent = header("user-agent");

    let response = match ApiRequest::from_http(req).await {
        Ok(request) => state.dispatcher.handle(&request).await,
        Err(e) => state.dispatcher.failure(&entry.method, &entry.path, &e),
    };

    if state.config.logging.access_log {
        entry.status = response.status_code;
        entry.body_bytes = response.body.len();
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    response.into_http()
}
