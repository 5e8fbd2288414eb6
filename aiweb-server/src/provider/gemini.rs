//! Gemini `generateContent` client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CompletionProvider, ProviderError};
use crate::config::Config;

const API_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone)]
pub struct GeminiProvider {
    api_key: Option<String>,
    model: String,
    base_url: String,
    client: Client,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl GeminiProvider {
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .user_agent(concat!("aiweb-server/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            api_key,
            model: model.into(),
            base_url: base_url.into(),
            client,
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self, ProviderError> {
        Self::new(
            cfg.gemini_api_key.clone(),
            cfg.gemini_model.clone(),
            cfg.gemini_base_url.clone(),
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl CompletionProvider for GeminiProvider {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(ProviderError::NotConfigured { key: API_KEY_VAR })?;

        let body = GenerateContentRequest {
            contents: [Content { role: "user", parts: [Part { text: prompt }] }],
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "gemini generateContent");

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = api_error_message(&text);
            return Err(if status == StatusCode::TOO_MANY_REQUESTS {
                ProviderError::RateLimited { message }
            } else {
                ProviderError::Api { status: status.as_u16(), message }
            });
        }

        let text = resp.text().await?;
        let data: GenerateContentResponse =
            serde_json::from_str(&text).map_err(|e| ProviderError::Malformed(e.to_string()))?;
        Ok(extract_text(data))
    }
}

/// Concatenate the parts of the first candidate, trimmed.
fn extract_text(resp: GenerateContentResponse) -> String {
    resp.candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default()
        .trim()
        .to_owned()
}

/// Pull `error.message` out of a Gemini error body, falling back to the raw text.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_owned())
}
