//! Replication engine error types
//!
//! End of stream is an error *kind* because that is how the engine reports
//! it, but it is the normal terminator of a one-shot dump. Callers must test
//! `is_end_of_stream()` before treating an engine error as a failure.

use std::fmt;

/// Engine error kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineErrorKind {
    /// Server closed the dump at end of file
    EndOfStream,

    /// An event could not be decoded
    Decode,

    /// Connection to the server failed or dropped
    Connection,

    /// Session could not be set up (bad start position, rejected dump)
    Setup,
}

/// Replication engine error
#[derive(Debug, Clone)]
pub struct EngineError {
    /// Error kind
    pub kind: EngineErrorKind,
    /// Error message
    pub message: String,
}

impl EngineError {
    /// Create a new engine error.
    pub fn new(kind: EngineErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Create an end of stream signal.
    pub fn end_of_stream(message: impl Into<String>) -> Self {
        Self::new(EngineErrorKind::EndOfStream, message)
    }

    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(EngineErrorKind::Decode, message)
    }

    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(EngineErrorKind::Connection, message)
    }

    /// Create a setup error.
    pub fn setup(message: impl Into<String>) -> Self {
        Self::new(EngineErrorKind::Setup, message)
    }

    /// Check if this is the expected end of a one-shot dump.
    pub fn is_end_of_stream(&self) -> bool {
        self.kind == EngineErrorKind::EndOfStream
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EngineError({:?}): {}", self.kind, self.message)
    }
}

impl std::error::Error for EngineError {}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
