//! Crate-wide error type and `Result` alias.

use thiserror::Error;

/// Errors surfaced by the pq library and CLI.
#[derive(Debug, Error)]
pub enum PqError {
    /// Bad ratio, invalid range, unsafe identifier. Rejected before the
    /// database is touched.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The SQL engine reported a failure. Carries the failing statement
    /// text for observability.
    #[error("query failed: {source} (statement: {sql})")]
    Execution {
        sql: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Lookup for an id outside the expected scope.
    #[error("not found: {0}")]
    NotFound(String),

    /// The engine lacks a required capability (e.g. the sqlite-vec
    /// extension). Fatal at startup, never raised per-query.
    #[error("feature not supported: {0}")]
    FeatureNotSupported(String),

    /// A search was cancelled via its `CancelToken`.
    #[error("search cancelled")]
    Cancelled,

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PqError>;
