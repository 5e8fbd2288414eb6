//! Stateless chat relay route, nested under `/chat`.
//!
//! The caller sends the full conversation history with every request; the
//! server forwards it with the new message to the completion provider and
//! returns exactly one assistant turn.

use std::sync::Arc;

use aiweb_types::{ChatRequest, ChatResponse, ErrorBody, Message, Role};
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tracing::info;
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::extract::AppJson;
use crate::services::chatbot;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(chat_message),
    components(schemas(ChatRequest, ChatResponse, Message, Role, ErrorBody))
)]
pub struct ChatApi;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/message", post(chat_message))
}

/// Relay one chat turn (`POST /chat/message`).
#[utoipa::path(
    post,
    path = "/chat/message",
    tag = "chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatResponse),
        (status = 422, description = "Empty message", body = ErrorBody),
        (status = 503, description = "Completion provider failure", body = ErrorBody),
    )
)]
pub async fn chat_message(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<ChatRequest>,
) -> Result<Json<ChatResponse>, ServerError> {
    let resp =
        chatbot::send_chat_message(state.provider.as_ref(), &req.message, &req.history).await?;
    info!(history_len = req.history.len(), reply_len = resp.content.len(), "chat turn relayed");
    Ok(Json(resp))
}
