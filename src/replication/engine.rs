//! Replication engine contract
//!
//! The engine does the real work of binlog decoding and row mapping. This
//! module only names what a recovery session needs from it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::EngineResult;
use super::heartbeat::HeartbeatSource;
use crate::binlog::BinlogPosition;
use crate::config::MysqlEndpoint;

/// Kind of row change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    /// Row inserted
    Insert,
    /// Row updated
    Update,
    /// Row deleted
    Delete,
}

/// A decoded row change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowRecord {
    /// Database the row belongs to
    pub database: String,
    /// Table the row belongs to
    pub table: String,
    /// Change kind
    pub kind: RowKind,
    /// Position immediately after the event that produced this row
    pub position: BinlogPosition,
    /// Column values after the change (before, for deletes)
    pub data: BTreeMap<String, Value>,
}

impl RowRecord {
    /// Create a row with no column data.
    pub fn new(
        database: impl Into<String>,
        table: impl Into<String>,
        kind: RowKind,
        position: BinlogPosition,
    ) -> Self {
        Self {
            database: database.into(),
            table: table.into(),
            kind,
            position,
            data: BTreeMap::new(),
        }
    }

    /// Builder-style column setter.
    pub fn with_column(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(column.into(), value.into());
        self
    }
}

/// One unit of output from the engine
#[derive(Debug, Clone, PartialEq)]
pub enum ReplicationEvent {
    /// A decoded row change
    Row(RowRecord),
    /// A heartbeat value surfaced directly by the engine
    Heartbeat(u64),
}

/// How a replication session is set up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSpec {
    /// Where to start reading
    pub start: BinlogPosition,

    /// Ask the server to stop at the end of `start.file` instead of tailing
    /// live writes. Recovery sessions always set this; it is not a replica
    /// identity.
    pub one_shot: bool,

    /// Server to read from
    pub endpoint: MysqlEndpoint,

    /// Where heartbeat rows live
    pub heartbeat: HeartbeatSource,
}

impl SessionSpec {
    /// Spec for a bounded single-file replay starting at `start`.
    pub fn one_shot(start: BinlogPosition, endpoint: MysqlEndpoint, heartbeat: HeartbeatSource) -> Self {
        Self {
            start,
            one_shot: true,
            endpoint,
            heartbeat,
        }
    }
}

/// A streaming replication engine bound to one start position.
pub trait ReplicationEngine {
    /// Open the dump. May report end of stream if the file holds nothing
    /// past the start position.
    fn start(&mut self) -> EngineResult<()>;

    /// Next decoded event, or `None` once the stream is drained.
    fn next_event(&mut self) -> EngineResult<Option<ReplicationEvent>>;

    /// Release the dump handle and decoding buffers.
    fn stop(&mut self) -> EngineResult<()>;
}

/// Builds engines for recovery sessions.
pub trait EngineFactory {
    /// Schema snapshot the engine decodes against
    type Snapshot;
    /// Engine produced
    type Engine: ReplicationEngine;

    /// Build an engine that owns `snapshot` and reads per `spec`.
    fn create(&self, snapshot: Self::Snapshot, spec: &SessionSpec) -> EngineResult<Self::Engine>;
}
