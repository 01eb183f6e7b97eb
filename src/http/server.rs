//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the quote handler
//! - Wire up middleware (tracing, request ID)
//! - Bind server to listener
//! - Drain on shutdown

use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::http::quote::get_cotacao;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::lifecycle::Shutdown;
use crate::rates::{HttpRateProvider, RateProvider, RateStore, SqliteRateStore};

/// Path of the quote endpoint.
pub const COTACAO_PATH: &str = "/cotacao";

/// Application state injected into handlers.
///
/// Everything here is shared read-only; each request opens its own store
/// connection.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn RateProvider>,
    pub store: Arc<dyn RateStore>,
    pub shutdown: Arc<Shutdown>,
}

/// HTTP server answering `GET /cotacao`.
pub struct RateServer {
    router: Router,
    shutdown: Arc<Shutdown>,
}

impl RateServer {
    /// Create a server from configuration, using the shared HTTP client.
    pub fn new(config: &ServerConfig) -> Self {
        let provider = HttpRateProvider::with_shared_client(config.upstream.url.clone());
        let store = SqliteRateStore::new(config.storage.database_url.clone());
        Self::with_components(Arc::new(provider), Arc::new(store))
    }

    /// Create a server around explicit provider and store implementations.
    pub fn with_components(provider: Arc<dyn RateProvider>, store: Arc<dyn RateStore>) -> Self {
        let shutdown = Arc::new(Shutdown::new());
        let state = AppState {
            provider,
            store,
            shutdown: shutdown.clone(),
        };

        Self {
            router: Self::build_router(state),
            shutdown,
        }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route(COTACAO_PATH, get(get_cotacao))
            .with_state(state)
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Shutdown coordinator for this server.
    pub fn shutdown(&self) -> Arc<Shutdown> {
        self.shutdown.clone()
    }

    /// Run the server until shutdown is triggered.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let mut shutdown_rx = self.shutdown.subscribe();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
