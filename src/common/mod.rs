//! Common types shared across the pipeline: the unified error type and
//! renderer configuration.

// Submodule declarations
pub mod config;
pub mod error;

// Re-exports for convenience
pub use config::Config;
pub use error::{Error, Result};
