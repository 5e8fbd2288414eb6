//! API base resolution.
//!
//! The base URL is resolved once when the client is built and never changes
//! afterwards: an explicit value wins, then `AIWEB_API_BASE`, then
//! `http://localhost:8000`.

use reqwest::Url;

use crate::error::ClientError;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
pub const API_BASE_VAR: &str = "AIWEB_API_BASE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_base: Url,
}

impl ClientConfig {
    /// Parse `api_base`; it must be an absolute `http` or `https` URL.
    pub fn new(api_base: &str) -> Result<Self, ClientError> {
        let invalid = |message: String| ClientError::InvalidBaseUrl {
            url: api_base.to_owned(),
            message,
        };

        let mut url = Url::parse(api_base.trim()).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        // Keep a trailing slash so relative joins append instead of replacing
        // the last path segment.
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self { api_base: url })
    }

    /// Resolve from `AIWEB_API_BASE`, falling back to [`DEFAULT_API_BASE`].
    pub fn from_env() -> Result<Self, ClientError> {
        Self::resolve(None)
    }

    /// Use `explicit` when given, otherwise behave like [`ClientConfig::from_env`].
    pub fn resolve(explicit: Option<&str>) -> Result<Self, ClientError> {
        match explicit {
            Some(base) => Self::new(base),
            None => match std::env::var(API_BASE_VAR) {
                Ok(base) if !base.trim().is_empty() => Self::new(&base),
                _ => Self::new(DEFAULT_API_BASE),
            },
        }
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Absolute URL for an API path such as `"/chat/message"`.
    pub fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.api_base
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::InvalidBaseUrl {
                url: self.api_base.to_string(),
                message: e.to_string(),
            })
    }
}
