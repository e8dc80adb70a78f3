//! Recovery outcome and report
//!
//! Recovery is binary: a resume position on the new master, or nothing.
//! The report adds what an operator needs to act on "nothing": every
//! candidate visited and what happened to it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::errors::{RecoveryError, RecoveryResult};
use super::request::RecoveryRequest;
use crate::binlog::BinlogPosition;

/// Result of one recovery attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecoveryOutcome {
    /// Resume streaming from `position` on the new master
    Recovered { position: BinlogPosition },
    /// No candidate carried the target heartbeat
    HeartbeatNotFound,
}

impl RecoveryOutcome {
    /// Resume position, if recovery succeeded.
    pub fn position(&self) -> Option<&BinlogPosition> {
        match self {
            RecoveryOutcome::Recovered { position } => Some(position),
            RecoveryOutcome::HeartbeatNotFound => None,
        }
    }

    /// Whether recovery succeeded.
    pub fn is_recovered(&self) -> bool {
        self.position().is_some()
    }
}

/// What happened to one candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CandidateResult {
    /// Heartbeat found
    Matched { position: BinlogPosition },
    /// Stream ended without the heartbeat
    Exhausted { rows_scanned: u64 },
    /// Replay failed; recovery moved on
    Failed { code: &'static str, reason: String },
}

/// One visited candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateReport {
    /// Where the scan started
    pub start: BinlogPosition,
    /// How it ended
    #[serde(flatten)]
    pub result: CandidateResult,
}

/// Full record of one recovery attempt
#[derive(Debug, Clone, Serialize)]
pub struct RecoveryReport {
    /// Attempt identifier, shared with the attempt's log events
    pub attempt_id: Uuid,
    /// Request this attempt served
    pub request: RecoveryRequest,
    /// Number of binlogs the new master listed
    pub catalog_size: usize,
    /// Candidates in the order visited (newest first)
    pub candidates: Vec<CandidateReport>,
    /// Final outcome
    pub outcome: RecoveryOutcome,
    /// When the attempt began
    pub started_at: DateTime<Utc>,
    /// When the attempt ended
    pub finished_at: DateTime<Utc>,
}

impl RecoveryReport {
    /// Files visited, in visit order.
    pub fn visited_files(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.start.file.as_str()).collect()
    }

    /// Candidates whose replay failed.
    pub fn failed_candidates(&self) -> impl Iterator<Item = &CandidateReport> {
        self.candidates
            .iter()
            .filter(|c| matches!(c.result, CandidateResult::Failed { .. }))
    }

    /// Wall-clock duration of the attempt.
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Resume position, or `HeartbeatNotFound` as a fatal error.
    ///
    /// For callers that must halt rather than resume from an unvalidated
    /// position.
    pub fn into_position(self) -> RecoveryResult<BinlogPosition> {
        match self.outcome {
            RecoveryOutcome::Recovered { position } => Ok(position),
            RecoveryOutcome::HeartbeatNotFound => Err(RecoveryError::HeartbeatNotFound {
                heartbeat: self.request.target_heartbeat,
                candidates: self.candidates.len(),
            }),
        }
    }
}
