//! Wire types shared by `aiweb-server` and `aiweb-client`.
//!
//! Every request / response body that crosses the HTTP boundary lives here so
//! the two sides cannot drift apart.  Enable the `openapi` feature to derive
//! `utoipa::ToSchema` for the server's API description.

pub mod chat;
pub mod echo;
pub mod lesson;

pub use chat::{ChatRequest, ChatResponse, Message, Role};
pub use echo::{EchoPayload, EchoResponse};
pub use lesson::{LessonRequest, LessonResponse};

use serde::{Deserialize, Serialize};

/// Body returned by `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// JSON body of every non-2xx response: `{"error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorBody {
    pub error: String,
}
