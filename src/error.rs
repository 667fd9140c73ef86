//! Error types for the Glaive library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`GlaiveError`] enum. Validation failures (unknown sort field, inverted
//! range bounds, ambiguous auto-sort) use the `InvalidArgument` variant and
//! are raised before any dictionary or postings scan starts.

use std::io;

use thiserror::Error;

/// The main error type for Glaive operations.
#[derive(Error, Debug)]
pub enum GlaiveError {
    /// I/O errors propagated from the index-reading collaborator.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Index-related errors (dictionary/postings scan failures).
    #[error("Index error: {0}")]
    Index(String),

    /// Query-related errors (invalid queries, rewrite failures).
    #[error("Query error: {0}")]
    Query(String),

    /// Field-related errors.
    #[error("Field error: {0}")]
    Field(String),

    /// Invalid argument supplied by the caller.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid operation (e.g. executing a query that was never rewritten).
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Resource exhausted.
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Not implemented.
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error.
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with GlaiveError.
pub type Result<T> = std::result::Result<T, GlaiveError>;

impl GlaiveError {
    /// Create a new index error.
    pub fn index<S: Into<String>>(msg: S) -> Self {
        GlaiveError::Index(msg.into())
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        GlaiveError::Query(msg.into())
    }

    /// Create a new field error.
    pub fn field<S: Into<String>>(msg: S) -> Self {
        GlaiveError::Field(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        GlaiveError::InvalidArgument(msg.into())
    }

    /// Create a new invalid operation error.
    pub fn invalid_operation<S: Into<String>>(msg: S) -> Self {
        GlaiveError::InvalidOperation(msg.into())
    }

    /// Create a new not implemented error.
    pub fn not_implemented<S: Into<String>>(msg: S) -> Self {
        GlaiveError::NotImplemented(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        GlaiveError::Other(msg.into())
    }

    /// Check whether this error is an invalid-argument error.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, GlaiveError::InvalidArgument(_))
    }
}
