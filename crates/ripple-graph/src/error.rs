//! Error types for ripple-graph operations.
//!
//! Only infrastructure failures surface here: data-quality problems
//! (malformed source, unresolved names, dangling exports) degrade into
//! diagnostics on the report instead.

use thiserror::Error;

use crate::source::SourceError;

#[derive(Debug, Error)]
pub enum GraphError {
    /// A required source file could not be read.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(#[from] ripple_config::ConfigError),
}

pub type Result<T> = std::result::Result<T, GraphError>;
