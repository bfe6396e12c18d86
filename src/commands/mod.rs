//! CLI command implementations

pub mod serve;
pub mod trends;

// Re-export command functions for convenience
pub use serve::serve;
pub use trends::trends;
