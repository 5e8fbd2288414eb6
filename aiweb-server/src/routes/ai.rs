//! Lesson-outline and lesson-summary routes, nested under `/ai`.

use std::sync::Arc;

use aiweb_types::{ErrorBody, LessonRequest, LessonResponse};
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::extract::AppJson;
use crate::services::lesson::{self, LessonKind};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(lesson_outline, lesson_summary),
    components(schemas(LessonRequest, LessonResponse, ErrorBody))
)]
pub struct AiApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/lesson-outline", post(lesson_outline))
        .route("/lesson-summary", post(lesson_summary))
}

#[utoipa::path(
    post,
    path = "/ai/lesson-outline",
    tag = "ai",
    request_body = LessonRequest,
    responses(
        (status = 200, description = "Outline generated", body = LessonResponse),
        (status = 422, description = "Empty topic", body = ErrorBody),
        (status = 503, description = "Completion provider failure", body = ErrorBody),
    )
)]
pub async fn lesson_outline(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<LessonRequest>,
) -> Result<Json<LessonResponse>, ServerError> {
    let resp = lesson::generate(state.provider.as_ref(), LessonKind::Outline, &req.topic).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/ai/lesson-summary",
    tag = "ai",
    request_body = LessonRequest,
    responses(
        (status = 200, description = "Summary generated", body = LessonResponse),
        (status = 422, description = "Empty topic", body = ErrorBody),
        (status = 503, description = "Completion provider failure", body = ErrorBody),
    )
)]
pub async fn lesson_summary(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<LessonRequest>,
) -> Result<Json<LessonResponse>, ServerError> {
    let resp = lesson::generate(state.provider.as_ref(), LessonKind::Summary, &req.topic).await?;
    Ok(Json(resp))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::{app_with, post_json, send};
    use crate::services::testing::StubProvider;

    #[tokio::test]
    async fn outline_is_split_into_lines() {
        let app = app_with(Arc::new(StubProvider::replying("1. Intro\n2. Body\n3. Conclusion")));
        let (status, body) =
            send(&app, post_json("/ai/lesson-outline", json!({ "topic": "widgets" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "topic": "widgets", "outline": ["Intro", "Body", "Conclusion"] })
        );
    }

    #[tokio::test]
    async fn blank_topic_is_422() {
        let provider = Arc::new(StubProvider::replying("unused"));
        let app = app_with(provider.clone());
        let (status, body) =
            send(&app, post_json("/ai/lesson-outline", json!({ "topic": "  " }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Topic must not be empty.");
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn provider_failure_is_503() {
        let app = app_with(Arc::new(StubProvider::failing()));
        let (status, body) =
            send(&app, post_json("/ai/lesson-summary", json!({ "topic": "widgets" }))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body["error"],
            "Failed to generate lesson summary: provider returned an error."
        );
    }

    #[tokio::test]
    async fn missing_topic_field_is_rejected() {
        let app = app_with(Arc::new(StubProvider::replying("unused")));
        let (status, body) = send(&app, post_json("/ai/lesson-outline", json!({}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].is_string());
    }
}
