//! Client-side chat state.
//!
//! A [`Conversation`] owns the ordered message list shown to the user and
//! allows one send at a time. The user's message is appended optimistically
//! when a send starts; it is removed again if the send fails, and the
//! assistant reply is appended if it succeeds.

use aiweb_types::{ChatRequest, ChatResponse, Message};
use thiserror::Error;
use tracing::debug;

use crate::api::Api;
use crate::error::ClientError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConversationState {
    #[default]
    Idle,
    Sending,
}

#[derive(Debug, Error)]
pub enum ConversationError {
    /// A send is already in flight.
    #[error("a message is already being sent")]
    Busy,

    #[error("message must not be empty")]
    EmptyMessage,

    /// `complete` or `fail` was called while idle.
    #[error("no message is being sent")]
    NotSending,

    #[error(transparent)]
    Request(#[from] ClientError),
}

#[derive(Debug, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    state: ConversationState,
    error: Option<String>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn is_sending(&self) -> bool {
        self.state == ConversationState::Sending
    }

    /// User-facing text of the last failed send, cleared by the next send.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Start a send: append the trimmed `text` as a user turn and return the
    /// request to post. The request's history is every message before the new
    /// one.
    pub fn begin(&mut self, text: &str) -> Result<ChatRequest, ConversationError> {
        if self.is_sending() {
            return Err(ConversationError::Busy);
        }
        let text = text.trim();
        if text.is_empty() {
            return Err(ConversationError::EmptyMessage);
        }

        let request = ChatRequest {
            message: text.to_owned(),
            history: self.messages.clone(),
        };
        self.messages.push(Message::user(text));
        self.state = ConversationState::Sending;
        self.error = None;
        Ok(request)
    }

    /// Finish a send successfully by appending the assistant turn.
    pub fn complete(&mut self, reply: ChatResponse) -> Result<(), ConversationError> {
        if !self.is_sending() {
            return Err(ConversationError::NotSending);
        }
        self.messages.push(reply.into());
        self.state = ConversationState::Idle;
        Ok(())
    }

    /// Finish a send unsuccessfully: drop the optimistic user turn and keep
    /// `error` for display.
    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), ConversationError> {
        if !self.is_sending() {
            return Err(ConversationError::NotSending);
        }
        self.messages.pop();
        self.error = Some(error.into());
        self.state = ConversationState::Idle;
        Ok(())
    }

    /// Send `text` through `api` and return the assistant turn.
    ///
    /// Chat is never retried; a failed call leaves the list as it was before
    /// the send and records the error.
    pub async fn send(&mut self, api: &Api, text: &str) -> Result<Message, ConversationError> {
        let req = self.begin(text)?;
        debug!(history_len = req.history.len(), "sending chat message");

        match api.send_chat(&req.message, &req.history).await {
            Ok(reply) => {
                let message = Message::from(reply.clone());
                self.complete(reply)?;
                Ok(message)
            }
            Err(e) => {
                self.fail(e.user_message())?;
                Err(e.into())
            }
        }
    }

    /// Forget every message and any pending error.
    pub fn clear(&mut self) -> Result<(), ConversationError> {
        if self.is_sending() {
            return Err(ConversationError::Busy);
        }
        self.messages.clear();
        self.error = None;
        Ok(())
    }
}
