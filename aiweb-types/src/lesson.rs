use serde::{Deserialize, Serialize};

/// Request body for `POST /ai/lesson-outline` and `POST /ai/lesson-summary`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LessonRequest {
    pub topic: String,
}

/// Normalised topic plus the ordered outline lines derived from the
/// provider's raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct LessonResponse {
    pub topic: String,
    pub outline: Vec<String>,
}
