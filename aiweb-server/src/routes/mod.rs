//! Axum router construction.
//!
//! [`build`] assembles the complete application router, including:
//! - Middleware layers (CORS, per-request trace-ID injection)
//! - Optional OpenAPI description (disable with `AIWEB_ENABLE_DOCS=false`)
//! - Health route
//! - Echo demo routes
//! - `/ai` lesson routes and the `/chat` relay

mod ai;
mod chat;
pub mod doc;
mod echo;
mod health;

use std::sync::Arc;

use axum::routing::get;
use axum::{middleware, Json, Router};

use crate::error::ServerError;
use crate::middleware::{cors, trace};
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .merge(health::router())
        .merge(echo::router())
        .nest("/ai", ai::router())
        .nest("/chat", chat::router());

    if state.config.enable_docs {
        app = app.route("/api-docs/openapi.json", get(|| async { Json(doc::get_docs()) }));
    }

    app.fallback(not_found)
        // Outermost layers execute first on the way in.
        .layer(cors::cors_layer(&state.config))
        .layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}

async fn not_found(uri: axum::http::Uri) -> ServerError {
    ServerError::NotFound(format!("no route for {}", uri.path()))
}
