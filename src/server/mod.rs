//! HTTP server and API routes

pub mod api;
pub mod app;

pub use api::create_router;
pub use app::{AppState, DashboardServer, ServerError};
