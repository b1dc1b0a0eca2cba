//! Error types for renderscope's fallible edges.
//!
//! Tracking, subscriptions, metrics and diagnostics never fail. Only loading
//! configuration and reading render traces can.

use thiserror::Error;

/// Errors from loading or validating a [`Config`](crate::Config).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read or written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for this schema.
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be rendered as TOML.
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is out of range.
    #[error("invalid value: {0}")]
    Invalid(String),
}

/// Errors from reading a render trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The trace file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A line is not a valid trace event.
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A line parsed but describes an impossible render.
    #[error("line {line}: {reason}")]
    InvalidEvent { line: usize, reason: String },
}
