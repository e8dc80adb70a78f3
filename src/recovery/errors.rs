//! Recovery error types
//!
//! Error codes:
//! - CDC_CATALOG_UNAVAILABLE (FATAL)
//! - CDC_SCHEMA_UNAVAILABLE (FATAL)
//! - CDC_CANDIDATE_SCAN_FAILED (ERROR, contained per candidate)
//! - CDC_HEARTBEAT_NOT_FOUND (FATAL, raised only when a caller asks for a
//!   position from an attempt that found none)
//!
//! End of stream is not listed: it is the normal end of a one-shot dump and
//! never leaves the session.

use std::fmt;

use thiserror::Error;

use crate::binlog::{BinlogPosition, CatalogError};
use crate::replication::EngineError;
use crate::schema::SchemaError;

/// Severity levels for recovery errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// This candidate failed; recovery moves on
    Error,
    /// The attempt cannot continue; an operator must act
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Master recovery error
#[derive(Debug, Error)]
pub enum RecoveryError {
    /// Binary logs on the new master could not be listed
    #[error("[FATAL] CDC_CATALOG_UNAVAILABLE: {0}")]
    CatalogUnavailable(#[from] CatalogError),

    /// Schema history for the old master could not be cloned
    #[error("[FATAL] CDC_SCHEMA_UNAVAILABLE: server-id {server_id} at {position}: {source}")]
    SchemaUnavailable {
        /// Old server id
        server_id: u64,
        /// Old position
        position: BinlogPosition,
        /// Store error
        #[source]
        source: SchemaError,
    },

    /// One candidate's replay failed for a reason other than end of stream
    #[error("[ERROR] CDC_CANDIDATE_SCAN_FAILED: {file} after {rows_scanned} rows: {source}")]
    CandidateScanFailed {
        /// Candidate binlog file
        file: String,
        /// Rows read before the failure
        rows_scanned: u64,
        /// Engine error
        #[source]
        source: EngineError,
    },

    /// No candidate carried the target heartbeat
    #[error("[FATAL] CDC_HEARTBEAT_NOT_FOUND: heartbeat {heartbeat} not found in {candidates} binlogs")]
    HeartbeatNotFound {
        /// Target heartbeat
        heartbeat: u64,
        /// Candidates scanned
        candidates: usize,
    },
}

impl RecoveryError {
    /// Create a candidate scan failure.
    pub fn candidate_scan_failed(
        file: impl Into<String>,
        rows_scanned: u64,
        source: EngineError,
    ) -> Self {
        RecoveryError::CandidateScanFailed {
            file: file.into(),
            rows_scanned,
            source,
        }
    }

    /// Returns the stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            RecoveryError::CatalogUnavailable(_) => "CDC_CATALOG_UNAVAILABLE",
            RecoveryError::SchemaUnavailable { .. } => "CDC_SCHEMA_UNAVAILABLE",
            RecoveryError::CandidateScanFailed { .. } => "CDC_CANDIDATE_SCAN_FAILED",
            RecoveryError::HeartbeatNotFound { .. } => "CDC_HEARTBEAT_NOT_FOUND",
        }
    }

    /// Returns the severity level.
    pub fn severity(&self) -> Severity {
        match self {
            RecoveryError::CandidateScanFailed { .. } => Severity::Error,
            _ => Severity::Fatal,
        }
    }

    /// Returns whether this error ends the recovery attempt.
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

/// Result type for recovery operations
pub type RecoveryResult<T> = Result<T, RecoveryError>;
