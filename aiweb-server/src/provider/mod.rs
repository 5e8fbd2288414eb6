//! Completion provider abstraction.
//!
//! [`CompletionProvider`] turns one prompt into generated text.  The default
//! implementation is [`gemini::GeminiProvider`]; services only ever see the
//! trait object held in [`crate::state::AppState`], which keeps the hosted
//! API swappable and lets tests inject a stub.

pub mod gemini;

use async_trait::async_trait;
use thiserror::Error;

pub use gemini::GeminiProvider;

/// An opaque `complete(prompt) -> text` service.
#[async_trait]
pub trait CompletionProvider: Send + Sync + 'static {
    /// Issue exactly one completion call for `prompt`.
    ///
    /// An empty string means the provider answered without content.
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Errors raised while talking to the completion provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The credential needed to reach the provider is missing.
    #[error("{key} is not configured. Set it in the server environment before calling the service")]
    NotConfigured { key: &'static str },

    /// Network failure, TLS failure, or an undecodable body.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 429 from the provider.
    #[error("rate limited by provider: {message}")]
    RateLimited { message: String },

    /// Any other non-2xx answer.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// A 2xx answer whose body did not have the expected shape.
    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Short, non-leaking description suitable for returning to callers.
    ///
    /// The full error (including provider messages) is only ever logged.
    pub fn summary(&self) -> String {
        match self {
            ProviderError::NotConfigured { key } => format!("{key} is not configured"),
            ProviderError::Http(_) => "provider unreachable".to_owned(),
            ProviderError::RateLimited { .. } => "provider rate limit exceeded".to_owned(),
            ProviderError::Api { .. } => "provider returned an error".to_owned(),
            ProviderError::Malformed(_) => "malformed provider response".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_does_not_leak_provider_detail() {
        let err = ProviderError::Api { status: 400, message: "API key sk-secret invalid".into() };
        assert!(!err.summary().contains("sk-secret"));
        assert!(err.to_string().contains("sk-secret"));
    }

    #[test]
    fn not_configured_names_the_variable() {
        let err = ProviderError::NotConfigured { key: "GEMINI_API_KEY" };
        assert_eq!(err.summary(), "GEMINI_API_KEY is not configured");
    }
}
