//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::config::Config;
use crate::provider::CompletionProvider;
use crate::services::echo::FlakyEchoTracker;

/// State shared across all HTTP handlers.
///
/// Built once in `main` and never mutated afterwards; the flaky-echo
/// counters are the only interior mutability.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Completion provider used by the lesson and chat services.
    pub provider: Arc<dyn CompletionProvider>,
    /// Failure counters for `POST /flaky-echo`.
    pub flaky_echo: Arc<FlakyEchoTracker>,
}

impl AppState {
    pub fn new(config: Config, provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            config: Arc::new(config),
            provider,
            flaky_echo: Arc::new(FlakyEchoTracker::new()),
        }
    }
}
