//! HTTP API server for transaction queries
//!
//! Routes are organized into modules:
//! - routes::transactions: transaction list and detail
//! - routes::health: liveness probe
//!
//! Every route is served both at the root and under `/api`.

pub mod error;
pub mod extract;
pub mod routes;

use anyhow::Context;
use axum::{routing::get, Router};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use txnstack_config::Config;
use txnstack_core::TransactionService;

pub use error::ApiError;
pub use extract::CurrentUser;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<TransactionService>,
    pub config: Arc<Config>,
}

fn api_routes() -> Router<AppState> {
    use routes::health::health_check;
    use routes::transactions::{api_transaction_detail, api_transactions};

    Router::new()
        .route("/health", get(health_check))
        .route("/transactions", get(api_transactions))
        .route("/transactions/:id", get(api_transaction_detail))
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(api_routes())
        .nest("/api", api_routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server
///
/// Binds the configured address and serves until `shutdown` resolves.
pub async fn start_server<F>(state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = state.config.listen_addr();
    let router = create_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    log::info!("Starting transactions API on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - GET /transactions (filtered list)");
    log::info!("  - GET /transactions/:id (single transaction)");
    log::info!("  - GET /health");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .context("server error")?;

    log::info!("Server stopped gracefully");
    Ok(())
}

/// Resolves on Ctrl+C, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
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
                log::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    log::info!("Shutdown signal received");
}

// ==================== Tests ====================
