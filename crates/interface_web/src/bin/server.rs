//! Pet Records - Web Server Binary
//!
//! Starts the HTTP front-end for browsing and editing pet records stored in
//! the CRM.
//!
//! # Usage
//!
//! ```bash
//! # Run with a .env file providing the CRM credential
//! cargo run --bin pets-web
//!
//! # Run with environment variables
//! CRM_ACCESS_TOKEN=pat-... CRM_OBJECT_TYPE=2-42115507 SERVER_PORT=3000 cargo run --bin pets-web
//! ```
//!
//! # Environment Variables
//!
//! * `SERVER_HOST` - Server host (default: 0.0.0.0)
//! * `SERVER_PORT` - Server port (default: 3000)
//! * `SERVER_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `SERVER_STATIC_DIR` - Static asset directory (default: public)
//! * `CRM_BASE_URL` - CRM API host (default: https://api.hubapi.com)
//! * `CRM_ACCESS_TOKEN` - Private app access token (required)
//! * `CRM_OBJECT_TYPE` - Custom object type id (required)
//! * `CRM_SEARCH_FAILURE_POLICY` - `treat_as_not_found` or `propagate` (default: treat_as_not_found)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_pet::{HubSpotClient, ReconciliationService};
use interface_web::{config::AppConfig, create_router};

/// Main entry point for the web server.
///
/// Initializes logging, loads configuration, builds the CRM client and
/// starts the HTTP server.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded from environment
/// - The CRM configuration is incomplete
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("failed to load configuration")?;

    init_tracing(&config.server.log_level);

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        crm = ?config.crm,
        "Starting pet records web server"
    );

    let policy = config.crm.search_failure_policy;
    let client = HubSpotClient::new(config.crm.clone()).context("invalid CRM configuration")?;
    let service = ReconciliationService::new(Arc::new(client), policy);

    let app = create_router(service, &config.server);

    let addr: SocketAddr = config
        .server
        .server_addr()
        .parse()
        .context("invalid server address")?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
