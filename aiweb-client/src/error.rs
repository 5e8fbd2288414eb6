use thiserror::Error;

/// Errors that can be returned by aiweb-client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a complete HTTP response (connection
    /// refused, DNS failure, body cut short).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The server answered 2xx but the body was not the expected JSON.
    #[error("unexpected response from the server: {0}")]
    Json(#[from] serde_json::Error),

    /// The configured API base is not an absolute http(s) URL.
    #[error("invalid API base URL {url:?}: {message}")]
    InvalidBaseUrl { url: String, message: String },

    /// Every attempt of a retried call failed; `last` is the final cause.
    #[error("The service is having a temporary issue. Please try again.")]
    Transient {
        #[source]
        last: Box<ClientError>,
    },
}

impl ClientError {
    /// Text suitable for showing to an end user.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } if !message.is_empty() => message.clone(),
            ClientError::Api { status, .. } => format!("Request failed with status {status}."),
            ClientError::Http(_) => "Unable to reach the server. Please try again.".to_owned(),
            ClientError::Json(_) => "The server sent a response that could not be read.".to_owned(),
            other => other.to_string(),
        }
    }

    /// HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transient { last } => last.status(),
            _ => None,
        }
    }
}
