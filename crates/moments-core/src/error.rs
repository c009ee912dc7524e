//! Error types for moments-core.
//!
//! Calendar and layout computations never fail; they degrade and log
//! instead. Errors only surface at the boundaries: timezone names,
//! configuration documents and record-store access.

use thiserror::Error;

/// The main error type for moments-core operations.
#[derive(Debug, Error)]
pub enum MomentsError {
    /// Invalid timezone name provided.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Error parsing a value such as a bucket type or scale name.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Configuration document is malformed or has out-of-range values.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// The record store could not answer a query.
    #[error("Store error: {0}")]
    Store(String),
}

/// Result type alias for moments-core operations.
pub type Result<T> = std::result::Result<T, MomentsError>;
