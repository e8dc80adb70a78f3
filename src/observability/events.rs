//! Master recovery lifecycle events
//!
//! Every recovery attempt emits a start event, one scan event per candidate
//! visited, and exactly one terminal event (recovered, not found, or
//! aborted). Silent recovery is not possible.

use std::fmt;

use uuid::Uuid;

use crate::binlog::BinlogPosition;

/// Observable events during master recovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoveryEvent {
    /// recovery.master_change.started
    Started {
        attempt_id: Uuid,
        old_server_id: u64,
        old_position: BinlogPosition,
        heartbeat: u64,
    },

    /// recovery.master_change.catalog_listed
    CatalogListed { attempt_id: Uuid, candidates: usize },

    /// recovery.master_change.scan_started
    ScanStarted { attempt_id: Uuid, start: BinlogPosition },

    /// recovery.master_change.scan_exhausted
    ScanExhausted {
        attempt_id: Uuid,
        file: String,
        rows_scanned: u64,
    },

    /// recovery.master_change.scan_failed
    ScanFailed {
        attempt_id: Uuid,
        file: String,
        reason: String,
    },

    /// recovery.master_change.recovered
    Recovered {
        attempt_id: Uuid,
        position: BinlogPosition,
    },

    /// recovery.master_change.heartbeat_not_found
    HeartbeatNotFound {
        attempt_id: Uuid,
        heartbeat: u64,
        candidates: usize,
    },

    /// recovery.master_change.aborted
    Aborted { attempt_id: Uuid, reason: String },
}

impl RecoveryEvent {
    /// Get the event name for logging.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Started { .. } => "recovery.master_change.started",
            Self::CatalogListed { .. } => "recovery.master_change.catalog_listed",
            Self::ScanStarted { .. } => "recovery.master_change.scan_started",
            Self::ScanExhausted { .. } => "recovery.master_change.scan_exhausted",
            Self::ScanFailed { .. } => "recovery.master_change.scan_failed",
            Self::Recovered { .. } => "recovery.master_change.recovered",
            Self::HeartbeatNotFound { .. } => "recovery.master_change.heartbeat_not_found",
            Self::Aborted { .. } => "recovery.master_change.aborted",
        }
    }

    /// Attempt this event belongs to.
    pub fn attempt_id(&self) -> Uuid {
        match self {
            Self::Started { attempt_id, .. }
            | Self::CatalogListed { attempt_id, .. }
            | Self::ScanStarted { attempt_id, .. }
            | Self::ScanExhausted { attempt_id, .. }
            | Self::ScanFailed { attempt_id, .. }
            | Self::Recovered { attempt_id, .. }
            | Self::HeartbeatNotFound { attempt_id, .. }
            | Self::Aborted { attempt_id, .. } => *attempt_id,
        }
    }

    /// Returns true if this event ends an attempt.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Recovered { .. } | Self::HeartbeatNotFound { .. } | Self::Aborted { .. }
        )
    }

    /// Returns true if this event needs an operator.
    pub fn needs_operator(&self) -> bool {
        matches!(self, Self::HeartbeatNotFound { .. } | Self::Aborted { .. })
    }
}

impl fmt::Display for RecoveryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.event_name())
    }
}
