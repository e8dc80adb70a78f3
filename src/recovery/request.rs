//! Recovery request
//!
//! What the pipeline knew when the old master went away: who it was, where
//! the pipeline had read up to, and the last heartbeat confirmed delivered
//! downstream. The request is persisted alongside stored positions so a
//! restart after a failover can still recover.

use serde::{Deserialize, Serialize};

use crate::binlog::BinlogPosition;

/// Immutable input to one recovery attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryRequest {
    /// Server id of the old master
    pub old_server_id: u64,
    /// Last position read on the old master
    pub old_position: BinlogPosition,
    /// Last heartbeat confirmed delivered downstream
    pub target_heartbeat: u64,
}

impl RecoveryRequest {
    /// Create a recovery request.
    pub fn new(old_server_id: u64, old_position: BinlogPosition, target_heartbeat: u64) -> Self {
        Self {
            old_server_id,
            old_position,
            target_heartbeat,
        }
    }

    /// One-line description for operator-facing messages.
    pub fn describe(&self) -> String {
        format!(
            "old-server-id: {}, file: {}, position: {}, heartbeat: {}",
            self.old_server_id,
            self.old_position.file,
            self.old_position.offset,
            self.target_heartbeat
        )
    }

    /// Serialize for storage.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Deserialize a stored request.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
