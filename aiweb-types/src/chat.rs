//! Chat relay request / response types.
//!
//! The server keeps no conversation state: callers send the full `history`
//! (oldest first) with every request and receive exactly one new turn back.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message in the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Request body for `POST /chat/message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ChatRequest {
    /// The new user message. Must not be blank after trimming.
    pub message: String,
    /// Prior turns, oldest first. Absent or `null` is treated as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub history: Vec<Message>,
}

/// Response body for `POST /chat/message`; always one assistant turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ChatResponse {
    pub role: Role,
    pub content: String,
}

impl ChatResponse {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

impl From<ChatResponse> for Message {
    fn from(resp: ChatResponse) -> Self {
        Message { role: resp.role, content: resp.content }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Message>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Message>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn history_defaults_to_empty_when_absent() {
        let req: ChatRequest = serde_json::from_str(r#"{"message":"Hello"}"#).unwrap();
        assert_eq!(req.message, "Hello");
        assert!(req.history.is_empty());
    }

    #[test]
    fn history_null_is_empty() {
        let req: ChatRequest =
            serde_json::from_str(r#"{"message":"Hello","history":null}"#).unwrap();
        assert!(req.history.is_empty());
    }

    #[test]
    fn history_preserves_order() {
        let req: ChatRequest = serde_json::from_str(
            r#"{"message":"How does it compare to Flask?","history":[
                {"role":"user","content":"What is FastAPI?"},
                {"role":"assistant","content":"FastAPI is a modern web framework."}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            req.history,
            vec![
                Message::user("What is FastAPI?"),
                Message::assistant("FastAPI is a modern web framework."),
            ]
        );
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = serde_json::from_str::<Message>(r#"{"role":"system","content":"hi"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn response_serializes_lowercase_role() {
        let json = serde_json::to_value(ChatResponse::assistant("Hi")).unwrap();
        assert_eq!(json, serde_json::json!({ "role": "assistant", "content": "Hi" }));
    }
}
