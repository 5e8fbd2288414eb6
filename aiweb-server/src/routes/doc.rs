use utoipa::OpenApi;

use crate::routes::{ai, chat, echo, health};

#[derive(OpenApi)]
#[openapi(info(
    title = "aiweb-server",
    description = "aiweb lab backend API",
    version = "0.1.0"
))]
pub struct ApiDoc;

pub fn get_docs() -> utoipa::openapi::OpenApi {
    let mut root = ApiDoc::openapi();
    root.merge(health::HealthApi::openapi());
    root.merge(echo::EchoApi::openapi());
    root.merge(ai::AiApi::openapi());
    root.merge(chat::ChatApi::openapi());
    root
}
