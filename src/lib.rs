//! mandi - Seller dashboard backend
//!
//! An HTTP API that computes market-trend insights per city and category,
//! reshapes them into chart-ready views, generates AI-assisted listing
//! content, and proxies the profile and product document stores.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`reshape`] - Chart-ready views derived from flat trend records
//! - [`trends`] - Trend discovery pipeline (search + LLM analysis)
//! - [`listing`] - Product listing content generation
//! - [`dashboard`] - Weekly seller summary
//! - [`planner`] - Festival-aware inventory planning report
//! - [`store`] - Profile, product, and object store clients
//! - [`server`] - Axum HTTP server and API routes
//! - [`models`] - Core data structures and types
//!
//! # Example
//!
//! ```no_run
//! use mandi::config::Config;
//! use mandi::server::DashboardServer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let server = DashboardServer::new(config)?;
//!     // server.start().await?;
//!     Ok(())
//! }
//! ```

pub mod commands;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod listing;
pub mod llm;
pub mod models;
pub mod planner;
pub mod reshape;
pub mod search;
pub mod server;
pub mod store;
pub mod trends;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, ErrorClassify, Result};
    pub use crate::models::{TrendQuery, TrendRecord, TrendsResponse};
    pub use crate::reshape::{DashboardViews, TrendAverage};
    pub use crate::server::DashboardServer;
}

// Direct re-exports for convenience
pub use models::{TrendQuery, TrendRecord, TrendsResponse};
pub use reshape::DashboardViews;
