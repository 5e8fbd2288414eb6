//! Client for the aiweb labs backend.
//!
//! - [`Api`]: typed calls for every backend endpoint.
//! - [`with_retry`] / [`RetryPolicy`]: bounded retry with a fixed delay, used
//!   by the flaky echo demo.
//! - [`Conversation`]: the one-send-at-a-time chat state kept by a UI.

pub mod api;
pub mod config;
pub mod conversation;
pub mod error;
pub mod retry;

pub use api::Api;
pub use config::ClientConfig;
pub use conversation::{Conversation, ConversationError, ConversationState};
pub use error::ClientError;
pub use retry::{RetryPolicy, with_retry};

pub use aiweb_types as types;
