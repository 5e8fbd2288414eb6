//! Extractors whose rejections go through [`ServerError`], so malformed
//! bodies and query strings get the same `{"error": ...}` shape as every
//! other failure.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequest, FromRequestParts, Query};
use axum::http::Extensions;
use axum::Json;

use crate::error::ServerError;

#[derive(FromRequest)]
#[from_request(via(Json), rejection(ServerError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(ServerError))]
pub struct AppQuery<T>(pub T);

/// Stable identifier for the caller: its IP when the server was started with
/// connect info, `"unknown"` otherwise.
pub fn client_host(extensions: &Extensions) -> String {
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_owned())
}
