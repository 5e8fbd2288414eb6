use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::trace::TRACE_ID_HEADER;
use crate::config::Config;

/// CORS for the browser UI: `AIWEB_CORS_ORIGINS` when it holds at least one
/// valid origin, any origin otherwise.
pub fn cors_layer(config: &Config) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origins(config.cors_allowed_origins.as_deref()))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, TRACE_ID_HEADER])
        .expose_headers([TRACE_ID_HEADER])
}

fn allowed_origins(list: Option<&str>) -> AllowOrigin {
    let origins: Vec<HeaderValue> = list
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect();

    if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    }
}
