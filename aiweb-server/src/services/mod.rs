//! Business logic behind each router.
//!
//! Services return `Result<T, ServiceError>` and know nothing about HTTP;
//! [`crate::error::ServerError`] turns a [`ServiceError`] into a status code
//! at the outermost layer.

pub mod chatbot;
pub mod echo;
pub mod lesson;

use thiserror::Error;

use crate::provider::ProviderError;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed or empty caller input. Never retried; 422 at the boundary.
    #[error("{0}")]
    Validation(String),

    /// The completion provider failed. The message keeps only the
    /// non-leaking summary; the full cause stays reachable via `source()`.
    #[error("Failed to generate {action}: {}.", .source.summary())]
    Provider {
        action: &'static str,
        #[source]
        source: ProviderError,
    },

    /// Deliberate failure raised by the flaky echo demo.
    #[error("{0}")]
    Transient(String),
}

impl ServiceError {
    pub(crate) fn provider(action: &'static str) -> impl FnOnce(ProviderError) -> Self {
        move |source| ServiceError::Provider { action, source }
    }
}

/// Trim `input` and reject it when nothing is left.
pub(crate) fn require_non_blank<'a>(input: &'a str, field: &str) -> Result<&'a str, ServiceError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::Validation(format!("{field} must not be empty.")));
    }
    Ok(trimmed)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Stub provider shared by service and router tests.

    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::provider::{CompletionProvider, ProviderError};

    #[derive(Default)]
    pub struct StubProvider {
        reply: Option<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl StubProvider {
        /// Always answers with `reply`.
        pub fn replying(reply: &str) -> Self {
            Self { reply: Some(reply.to_owned()), ..Default::default() }
        }

        /// Always fails with an HTTP 500-style provider error.
        pub fn failing() -> Self {
            Self::default()
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }

        pub fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionProvider for StubProvider {
        async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
            self.prompts.lock().unwrap().push(prompt.to_owned());
            match &self.reply {
                Some(reply) => Ok(reply.clone()),
                None => Err(ProviderError::Api { status: 500, message: "boom".into() }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_is_a_validation_error() {
        let err = require_non_blank(" \t\n", "Topic").unwrap_err();
        assert_eq!(err.to_string(), "Topic must not be empty.");
    }

    #[test]
    fn input_is_trimmed() {
        assert_eq!(require_non_blank("  widgets ", "Topic").unwrap(), "widgets");
    }

    #[test]
    fn provider_message_uses_summary() {
        let err = ServiceError::provider("lesson outline")(ProviderError::Api {
            status: 500,
            message: "internal stack trace".into(),
        });
        assert_eq!(
            err.to_string(),
            "Failed to generate lesson outline: provider returned an error."
        );
    }
}
