//! Server configuration, loaded from environment variables at startup.

/// Runtime configuration for aiweb-server.
///
/// Every field has a sensible default so the server works out-of-the-box
/// without any environment variables set.  Provider-backed endpoints answer
/// with 503 until `GEMINI_API_KEY` is supplied.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP address to bind (default: `"0.0.0.0:8000"`).
    pub bind_address: String,

    /// `tracing` filter string, e.g. `"info"` or `"debug,tower_http=warn"`.
    pub log_level: String,

    /// When `true`, emit log records as newline-delimited JSON.
    pub log_json: bool,

    /// Comma-separated list of allowed CORS origins.
    /// `None` means wildcard.
    pub cors_allowed_origins: Option<String>,

    /// Serve the OpenAPI description at `/api-docs/openapi.json`.
    pub enable_docs: bool,

    /// Gemini API key. Optional at startup.
    pub gemini_api_key: Option<String>,

    /// Gemini model identifier (default: `"gemini-2.5-flash"`).
    pub gemini_model: String,

    /// Gemini REST base URL, overridable for local stubs.
    pub gemini_base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_owned(),
            log_level: "info".to_owned(),
            log_json: false,
            cors_allowed_origins: Some(DEFAULT_CORS_ORIGINS.to_owned()),
            enable_docs: true,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_owned(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_owned(),
        }
    }
}

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173";

impl Config {
    /// Build [`Config`] from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            bind_address: lookup("AIWEB_BIND").unwrap_or(defaults.bind_address),
            log_level: lookup("AIWEB_LOG").unwrap_or(defaults.log_level),
            log_json: lookup("AIWEB_LOG_JSON").map(|v| is_truthy(&v)).unwrap_or(false),
            cors_allowed_origins: match lookup("AIWEB_CORS_ORIGINS") {
                Some(v) if v.trim() == "*" => None,
                Some(v) => Some(v),
                None => defaults.cors_allowed_origins,
            },
            enable_docs: lookup("AIWEB_ENABLE_DOCS").map(|v| is_truthy(&v)).unwrap_or(true),
            gemini_api_key: lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty()),
            gemini_model: lookup("GEMINI_MODEL")
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(defaults.gemini_model),
            gemini_base_url: lookup("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
        }
    }
}

// ── private helpers ──────────────────────────────────────────────────────────

fn is_truthy(v: &str) -> bool {
    v == "1" || v.eq_ignore_ascii_case("true")
}
