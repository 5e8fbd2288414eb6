//! One `http_request` span per call, keyed by a trace ID that callers can
//! supply in `x-trace-id` and always get back on the response.

use std::time::Instant;

use axum::body::{Body, HttpBody};
use axum::extract::Request;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::BoxError;
use http_body_util::{BodyExt, Limited};
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::error::ServerError;

pub const TRACE_ID_HEADER: HeaderName = HeaderName::from_static("x-trace-id");

/// JSON payloads up to this size are logged at debug level. Anything else,
/// or anything of unknown size, streams through untouched.
const BODY_LOG_LIMIT: usize = 1024;

pub async fn trace_middleware(req: Request, next: Next) -> Response {
    let trace_id = req
        .headers()
        .get(&TRACE_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);
    let span = info_span!(
        "http_request",
        %trace_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    async move {
        let started = Instant::now();
        let trace_header = HeaderValue::from_str(&trace_id.to_string()).ok();

        let response = match handle(req, next, trace_header.as_ref()).await {
            Ok(response) => response,
            Err(err) => err.into_response(),
        };
        let (mut parts, body) = response.into_parts();
        if let Some(value) = trace_header {
            parts.headers.insert(TRACE_ID_HEADER, value);
        }

        info!(
            status = parts.status.as_u16(),
            latency_ms = started.elapsed().as_millis() as u64,
            "request finished"
        );
        Response::from_parts(parts, body)
    }
    .instrument(span)
    .await
}

async fn handle(
    req: Request,
    next: Next,
    trace_header: Option<&HeaderValue>,
) -> Result<Response, ServerError> {
    let (mut parts, body) = req.into_parts();
    let body = log_small_json("request", &parts.headers, body)
        .await
        .map_err(|e| ServerError::InvalidRequest {
            status: StatusCode::BAD_REQUEST,
            message: format!("failed to read request body: {e}"),
        })?;
    if let Some(value) = trace_header {
        parts.headers.insert(TRACE_ID_HEADER, value.clone());
    }

    let (parts, body) = next.run(Request::from_parts(parts, body)).await.into_parts();
    let body = log_small_json("response", &parts.headers, body)
        .await
        .map_err(|e| {
            warn!(error = %e, "failed to read response body");
            ServerError::Internal("failed to read response body".to_owned())
        })?;
    Ok(Response::from_parts(parts, body))
}

/// Log `body` when it is JSON of a known size no larger than
/// [`BODY_LOG_LIMIT`]; otherwise return it without reading a byte.
async fn log_small_json(
    direction: &'static str,
    headers: &HeaderMap,
    body: Body,
) -> Result<Body, BoxError> {
    let declared = declared_len(headers, &body);
    let loggable = is_json(headers) && declared.is_some_and(|n| n <= BODY_LOG_LIMIT as u64);
    if !loggable {
        if let Some(size) = declared.filter(|n| *n > 0) {
            debug!(direction, size, "payload not logged");
        }
        return Ok(body);
    }

    // The declared length may be wrong; never hold more than the limit.
    let bytes = Limited::new(body, BODY_LOG_LIMIT).collect().await?.to_bytes();
    if !bytes.is_empty() {
        debug!(direction, body = %String::from_utf8_lossy(&bytes), "payload");
    }
    Ok(Body::from(bytes))
}

fn declared_len(headers: &HeaderMap, body: &Body) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .or_else(|| body.size_hint().exact())
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}
