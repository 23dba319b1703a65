//! Pipeline error types.
//!
//! Bad input shape (headers, unknown countries, unreadable files) is fatal and
//! surfaces here. Plausible real-world irregularities such as downward revisions
//! or zero denominators are absorbed by the transforms and never become errors.

use thiserror::Error;

/// Outbreak pipeline errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OutbreakError {
    /// A date column header could not be parsed
    #[error("Malformed date header: {0}")]
    MalformedDate(String),

    /// Two date column headers name the same calendar day
    #[error("Duplicate date column: {0}")]
    DuplicateDate(String),

    /// Country missing from the population registry
    #[error("Unknown country: {0}")]
    UnknownCountry(String),

    /// A per-country operation met a row without a country key
    #[error("Row for {0} has no country key")]
    MissingCountry(String),

    /// Join produced no rows
    #[error("Join produced no rows")]
    EmptyJoin,

    /// Input cell or record could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Reading the input failed
    #[error("I/O error: {0}")]
    Io(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for outbreak operations.
pub type Result<T> = std::result::Result<T, OutbreakError>;
