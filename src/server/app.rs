//! Dashboard server implementation
//!
//! Builds the shared application state, assembles the router, and runs the
//! HTTP server.

use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::llm::LlmClient;
use crate::search::SearchClient;
use crate::store::{DocumentStore, ObjectStore, ProductStore, ProfileStore};
use crate::trends::TrendsService;

use super::api::create_router;

// ============================================================================
// App State
// ============================================================================

/// Shared application state
///
/// Everything in here is immutable after startup; per-request state lives
/// in the handlers.
#[derive(Clone)]
pub struct AppState {
    /// Trend discovery pipeline (search + LLM)
    pub trends: Arc<TrendsService>,

    /// Profile document store
    pub profiles: ProfileStore,

    /// Product document store with image upload
    pub products: ProductStore,

    /// Server start time
    pub start_time: Instant,

    /// Configuration
    pub config: Config,
}

// ============================================================================
// Dashboard Server
// ============================================================================

/// Main dashboard API server
pub struct DashboardServer {
    config: Config,
    state: AppState,
}

impl DashboardServer {
    /// Create a new dashboard server
    pub fn new(config: Config) -> Result<Self, ServerError> {
        config
            .validate()
            .map_err(|e| ServerError::ConfigError(e.to_string()))?;

        let search = SearchClient::new(config.search.clone())
            .map_err(|e| ServerError::InitError(e.to_string()))?;
        let llm = LlmClient::with_config(config.llm.clone())
            .map_err(|e| ServerError::InitError(e.to_string()))?;
        let documents =
            DocumentStore::new(&config.store).map_err(|e| ServerError::InitError(e.to_string()))?;
        let objects =
            ObjectStore::new(&config.store).map_err(|e| ServerError::InitError(e.to_string()))?;

        let state = AppState {
            trends: Arc::new(TrendsService::new(search, llm)),
            profiles: ProfileStore::new(documents.clone()),
            products: ProductStore::new(documents, objects),
            start_time: Instant::now(),
            config: config.clone(),
        };

        Ok(Self { config, state })
    }

    /// Get the application state
    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let mut router = create_router(self.state.clone());

        // Add CORS layer if enabled
        if self.config.server.enable_cors {
            router = router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            );
        }

        // Add tracing layer if enabled
        if self.config.server.enable_request_logging {
            router = router.layer(TraceLayer::new_for_http());
        }

        router
    }

    /// Start the server
    pub async fn start(&self) -> Result<(), ServerError> {
        let router = self.build_router();
        let addr = self.config.server.bind_address;

        tracing::info!("Starting dashboard server on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(e.to_string()))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| ServerError::ServeError(e.to_string()))?;

        Ok(())
    }

    /// Start with graceful shutdown
    pub async fn start_with_shutdown(
        &self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), ServerError> {
        let router = self.build_router();
        let addr = self.config.server.bind_address;

        tracing::info!("Starting dashboard server on {} (with graceful shutdown)", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(e.to_string()))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ServerError::ServeError(e.to_string()))?;

        tracing::info!("Dashboard server shutdown complete");
        Ok(())
    }
}

// ============================================================================
// Server Errors
// ============================================================================

/// Server errors
#[derive(Debug, Clone)]
pub enum ServerError {
    /// Configuration error
    ConfigError(String),

    /// Initialization error
    InitError(String),

    /// Failed to bind to address
    BindError(String),

    /// Server error
    ServeError(String),
}

impl std::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            Self::InitError(msg) => write!(f, "Initialization error: {}", msg),
            Self::BindError(msg) => write!(f, "Failed to bind: {}", msg),
            Self::ServeError(msg) => write!(f, "Server error: {}", msg),
        }
    }
}

impl std::error::Error for ServerError {}

// ============================================================================
// Tests
// ============================================================================
