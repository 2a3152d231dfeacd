//! Process-wide tracing setup and per-request access logging.
//!
//! Each request runs inside a `request` span carrying method, uri,
//! request id, remote address, content length and user agent. When the
//! response is ready one event is emitted in that span, at a level picked
//! from the status code.

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Request, Response, StatusCode, header};
use tower_http::trace::{MakeSpan, OnResponse};
use tracing::{Level, Span, error, info, info_span, warn};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn init_tracing(development: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    let default_level = if development { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt().with_env_filter(filter).with_target(false).try_init();
}

/// Log level used for a response with `status`.
pub fn level_for_status(status: StatusCode) -> Level {
    if status.is_server_error() {
        Level::ERROR
    } else if status.is_client_error() {
        Level::WARN
    } else {
        Level::INFO
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let headers = request.headers();
        let remote_addr = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.to_string())
            .unwrap_or_else(|| "-".to_string());

        info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = header_text(headers, REQUEST_ID_HEADER),
            remote_addr = %remote_addr,
            content_length = content_length(headers),
            user_agent = header_text(headers, header::USER_AGENT.as_str()),
            error = tracing::field::Empty,
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseLogger;

impl<B> OnResponse<B> for ResponseLogger {
    fn on_response(self, response: &Response<B>, latency: Duration, _span: &Span) {
        let status = response.status();
        let code = status.as_u16();
        let latency_ms = latency.as_secs_f64() * 1000.0;

        let level = level_for_status(status);
        if level == Level::ERROR {
            error!(status = code, latency_ms, "server error");
        } else if level == Level::WARN {
            warn!(status = code, latency_ms, "client error");
        } else if status.is_redirection() {
            info!(status = code, latency_ms, "redirection");
        } else {
            info!(status = code, latency_ms, "request processed successfully");
        }
    }
}

fn header_text<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
}

fn content_length(headers: &HeaderMap) -> u64 {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or(0)
}
