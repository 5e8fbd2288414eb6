//! `GET /health` for curl and container health checks.

use std::sync::Arc;

use aiweb_types::HealthResponse;
use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(paths(get_health), components(schemas(HealthResponse)))]
pub struct HealthApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(get_health))
}

/// Liveness only; the completion provider is not contacted.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Server is up", body = HealthResponse))
)]
pub async fn get_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;

    use crate::routes::test_support::{app_with, send};
    use crate::services::testing::StubProvider;

    #[tokio::test]
    async fn reports_ok_without_touching_provider() {
        let provider = Arc::new(StubProvider::failing());
        let app = app_with(provider.clone());
        let (status, body) =
            send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }));
        assert_eq!(provider.calls(), 0);
    }
}
