//! Schema snapshot error types
//!
//! Error codes:
//! - CDC_SCHEMA_UNAVAILABLE (FATAL)

use std::fmt;

/// Schema store error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorKind {
    /// No schema history is recorded for the requested server
    UnknownServer,
    /// The requested position predates or postdates the recorded history
    PositionOutOfRange,
    /// The store could not be read
    StoreUnavailable,
}

/// Error raised while cloning a schema snapshot
#[derive(Debug, Clone)]
pub struct SchemaError {
    /// Error kind
    pub kind: SchemaErrorKind,
    /// Error message
    pub message: String,
}

impl SchemaError {
    /// Create a new schema error.
    pub fn new(kind: SchemaErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Create an unknown server error.
    pub fn unknown_server(server_id: u64) -> Self {
        Self::new(
            SchemaErrorKind::UnknownServer,
            format!("no schema history for server-id {}", server_id),
        )
    }

    /// Create a position out of range error.
    pub fn position_out_of_range(message: impl Into<String>) -> Self {
        Self::new(SchemaErrorKind::PositionOutOfRange, message)
    }

    /// Create a store unavailable error.
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(SchemaErrorKind::StoreUnavailable, message)
    }

    /// Returns the stable error code.
    pub fn code(&self) -> &'static str {
        "CDC_SCHEMA_UNAVAILABLE"
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SchemaError({:?}): {}", self.kind, self.message)
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
