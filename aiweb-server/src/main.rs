//! aiweb-server – HTTP backend for the aiweb labs.
//!
//! Reads `AIWEB_*` / `GEMINI_*` settings, installs the tracing subscriber,
//! builds the Gemini provider and serves the router until SIGINT or SIGTERM.

mod config;
mod error;
mod extract;
mod middleware;
mod provider;
mod routes;
mod services;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::provider::GeminiProvider;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::from_env();
    init_tracing(&cfg);

    info!(version = env!("CARGO_PKG_VERSION"), "aiweb-server starting");

    let provider = GeminiProvider::from_config(&cfg).context("failed to build Gemini client")?;
    if cfg.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; /ai and /chat endpoints will answer 503");
    }
    info!(model = provider.model(), "completion provider ready");

    let addr: SocketAddr = cfg
        .bind_address
        .parse()
        .with_context(|| format!("AIWEB_BIND={:?} is not a socket address", cfg.bind_address))?;

    let app = routes::build(Arc::new(AppState::new(cfg, Arc::new(provider))));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "listening");

    // Connect info feeds the per-caller counters of the flaky echo.
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(wait_for_shutdown())
        .await?;

    info!("aiweb-server stopped");
    Ok(())
}

/// `RUST_LOG` wins over `AIWEB_LOG`; an unparsable `AIWEB_LOG` falls back to `info`.
fn init_tracing(cfg: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.log_level))
        .unwrap_or_else(|e| {
            eprintln!("aiweb-server: ignoring AIWEB_LOG={:?} ({e}); using 'info'", cfg.log_level);
            EnvFilter::new("info")
        });

    let fmt = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    if cfg.log_json {
        fmt.json().init();
    } else {
        fmt.init();
    }
}

async fn wait_for_shutdown() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Ctrl-C handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => {}
        _ = sigterm => {}
    }

    info!("shutting down");
}
