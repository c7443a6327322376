//! # Roast & Brew Order Service
//!
//! Serves the storefront and admin JSON API.
//!
//! ```bash
//! RUST_LOG=roastbrew=debug cargo run --bin roastbrew
//! ```

use actor_framework::tracing::setup_tracing_with_default;
use roastbrew::config::AppConfig;
use roastbrew::http;
use roastbrew::lifecycle::OrderSystem;
use tracing::{error, info};

const DEFAULT_LOG_FILTER: &str = "roastbrew=info,actor_framework=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing_with_default(DEFAULT_LOG_FILTER);

    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e.to_string()
    })?;

    let system = OrderSystem::start(&config).await.map_err(|e| {
        error!(error = %e, "Could not start mail transport");
        e.to_string()
    })?;

    let app = http::router(system.service());

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Failed to bind to {addr}: {e}"))?;
    info!("roastbrew listening on http://{}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;
    if let Err(e) = &served {
        error!(error = %e, "Server error");
    }

    system.shutdown().await?;
    served.map_err(|e| e.to_string())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
