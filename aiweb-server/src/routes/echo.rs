//! Echo demo routes.
//!
//! `POST /echo` returns the payload unchanged; with `?failures=N` (or via
//! `POST /flaky-echo`, N defaulting to 1) the first N calls from a caller
//! fail with 503 so clients can exercise their retry wrapper.

use std::sync::Arc;

use aiweb_types::{EchoPayload, EchoResponse, ErrorBody};
use axum::extract::State;
use axum::http::Extensions;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::{IntoParams, OpenApi};

use crate::error::ServerError;
use crate::extract::{client_host, AppJson, AppQuery};
use crate::services::echo;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(echo_message, flaky_echo),
    components(schemas(EchoPayload, EchoResponse, ErrorBody))
)]
pub struct EchoApi;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EchoQuery {
    /// Number of sequential failures to simulate before succeeding.
    pub failures: Option<u32>,
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/echo", post(echo_message))
        .route("/flaky-echo", post(flaky_echo))
}

/// Return the payload unchanged, or simulate failures when `failures > 0`.
#[utoipa::path(
    post,
    path = "/echo",
    tag = "echo",
    params(EchoQuery),
    request_body = EchoPayload,
    responses(
        (status = 200, description = "Echoed message", body = EchoResponse),
        (status = 503, description = "Simulated transient failure", body = ErrorBody),
    )
)]
pub async fn echo_message(
    State(state): State<Arc<AppState>>,
    extensions: Extensions,
    AppQuery(query): AppQuery<EchoQuery>,
    AppJson(payload): AppJson<EchoPayload>,
) -> Result<Json<EchoResponse>, ServerError> {
    match query.failures {
        None | Some(0) => Ok(Json(echo::echo(payload.msg))),
        Some(failures) => {
            let host = client_host(&extensions);
            Ok(Json(state.flaky_echo.echo(payload.msg, &host, failures)?))
        }
    }
}

/// Fail `failures` times (default 1) per caller, then echo with the attempt count.
#[utoipa::path(
    post,
    path = "/flaky-echo",
    tag = "echo",
    params(EchoQuery),
    request_body = EchoPayload,
    responses(
        (status = 200, description = "Echoed message with attempt count", body = EchoResponse),
        (status = 503, description = "Simulated transient failure", body = ErrorBody),
    )
)]
pub async fn flaky_echo(
    State(state): State<Arc<AppState>>,
    extensions: Extensions,
    AppQuery(query): AppQuery<EchoQuery>,
    AppJson(payload): AppJson<EchoPayload>,
) -> Result<Json<EchoResponse>, ServerError> {
    let host = client_host(&extensions);
    let failures = query.failures.unwrap_or(1);
    Ok(Json(state.flaky_echo.echo(payload.msg, &host, failures)?))
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use axum::extract::ConnectInfo;
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::{app_with, post_json, send};
    use crate::services::testing::StubProvider;

    fn app() -> axum::Router {
        app_with(Arc::new(StubProvider::replying("unused")))
    }

    #[tokio::test]
    async fn echo_is_identity() {
        let (status, body) = send(&app(), post_json("/echo", json!({ "msg": "hello" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "msg": "hello" }));
    }

    #[tokio::test]
    async fn echo_with_failures_flag_fails_first() {
        let app = app();
        let (status, body) =
            send(&app, post_json("/echo?failures=2", json!({ "msg": "hi" }))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Simulated transient failure");

        let (status, _) = send(&app, post_json("/echo?failures=2", json!({ "msg": "hi" }))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, body) =
            send(&app, post_json("/echo?failures=2", json!({ "msg": "hi" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "msg": "hi", "attempts": 3 }));
    }

    #[tokio::test]
    async fn flaky_echo_defaults_to_one_failure() {
        let app = app();
        let (status, _) = send(&app, post_json("/flaky-echo", json!({ "msg": "x" }))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        let (status, body) = send(&app, post_json("/flaky-echo", json!({ "msg": "x" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["attempts"], 2);
    }

    #[tokio::test]
    async fn flaky_echo_counts_per_client_host() {
        let app = app();
        let from = |ip: &str| {
            let mut req = post_json("/flaky-echo", json!({ "msg": "x" }));
            let addr: SocketAddr = format!("{ip}:40000").parse().unwrap();
            req.extensions_mut().insert(ConnectInfo(addr));
            req
        };

        assert_eq!(send(&app, from("10.0.0.1")).await.0, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(send(&app, from("10.0.0.2")).await.0, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(send(&app, from("10.0.0.1")).await.0, StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_failures_value_is_rejected_as_json() {
        let (status, body) =
            send(&app(), post_json("/flaky-echo?failures=abc", json!({ "msg": "x" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }
}
