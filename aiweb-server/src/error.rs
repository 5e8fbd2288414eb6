//! HTTP boundary errors.
//!
//! Handlers return `Result<T, ServerError>`; this is the only place a
//! [`ServiceError`] or an extractor rejection is turned into a status code
//! and an `{"error": ...}` body. Provider causes are logged here and never
//! sent to the caller.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use aiweb_types::ErrorBody;
use thiserror::Error;
use tracing::{error, warn};

use crate::services::ServiceError;

/// All errors that can occur in the aiweb-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Propagated from the service layer.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The request body or query string could not be decoded.
    #[error("invalid request: {message}")]
    InvalidRequest { status: StatusCode, message: String },

    /// No route matched.
    #[error("not found: {0}")]
    NotFound(String),

    /// Something on the server side broke; the message is safe to return.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Service(ServiceError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ServerError::Service(ServiceError::Provider { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Service(ServiceError::Transient(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::InvalidRequest { status, .. } => *status,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn client_message(&self) -> String {
        match self {
            ServerError::Service(e) => e.to_string(),
            ServerError::InvalidRequest { message, .. } => message.clone(),
            ServerError::NotFound(m) | ServerError::Internal(m) => m.clone(),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ServerError::Service(ServiceError::Provider { action, source }) => {
                error!(action = *action, error = %source, "completion provider request failed");
            }
            ServerError::Service(ServiceError::Transient(m)) => {
                warn!(message = %m, "transient failure returned to caller");
            }
            ServerError::Internal(m) => {
                error!(message = %m, "internal error returned to caller");
            }
            _ => {}
        }
        let body = ErrorBody { error: self.client_message() };
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ServerError {
    fn from(rejection: JsonRejection) -> Self {
        ServerError::InvalidRequest { status: rejection.status(), message: rejection.body_text() }
    }
}

impl From<QueryRejection> for ServerError {
    fn from(rejection: QueryRejection) -> Self {
        ServerError::InvalidRequest { status: rejection.status(), message: rejection.body_text() }
    }
}
