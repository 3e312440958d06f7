//! Unified error types for mathalt.
//!
//! The rendering pipeline itself never fails (see [`crate::render`]); these
//! errors surface from the fallible edges: configuration loading and strict
//! MathML tree parsing.
use thiserror::Error;

/// Main error type for mathalt operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// XML parsing error
    #[error("XML error: {0}")]
    XmlError(String),

    /// Markup that parses as XML but is not a usable MathML fragment
    #[error("Malformed markup: {0}")]
    Malformed(String),

    /// Element nesting deeper than the parser accepts
    #[error("XML depth limit exceeded: {0}")]
    DepthLimitExceeded(usize),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for mathalt operations.
pub type Result<T> = std::result::Result<T, Error>;
