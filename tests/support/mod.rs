//! Fake collaborators for master recovery tests.
//!
//! Lives under `tests/support/` so it is not compiled as its own test
//! target. Every fake records what recovery asked of it.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use binlog_recovery::binlog::{BinlogPosition, Connection, ConnectionError, ConnectionProvider, QueryRow};
use binlog_recovery::replication::{
    EngineError, EngineFactory, EngineResult, ReplicationEngine, ReplicationEvent, RowKind,
    RowRecord, SessionSpec,
};
use binlog_recovery::schema::{SchemaError, SchemaResult, SchemaStore};

// =============================================================================
// Connection pool
// =============================================================================

pub struct ListingConnection {
    listing: Result<Vec<QueryRow>, ConnectionError>,
}

impl Connection for ListingConnection {
    fn query(&mut self, _sql: &str) -> Result<Vec<QueryRow>, ConnectionError> {
        self.listing.clone()
    }
}

/// New master as seen through the connection pool.
pub struct FakeMaster {
    listing: Option<Result<Vec<QueryRow>, ConnectionError>>,
    pub acquired: Cell<u32>,
    pub released: Cell<u32>,
}

impl FakeMaster {
    pub fn with_binlogs(files: &[&str]) -> Self {
        let rows = files
            .iter()
            .map(|f| QueryRow::new().with("Log_name", *f).with("File_size", "4096"))
            .collect();
        Self {
            listing: Some(Ok(rows)),
            acquired: Cell::new(0),
            released: Cell::new(0),
        }
    }

    pub fn failing_listing(message: &str) -> Self {
        Self {
            listing: Some(Err(ConnectionError::query_failed(message))),
            acquired: Cell::new(0),
            released: Cell::new(0),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            listing: None,
            acquired: Cell::new(0),
            released: Cell::new(0),
        }
    }
}

impl ConnectionProvider for FakeMaster {
    type Connection = ListingConnection;

    fn acquire(&self) -> Result<ListingConnection, ConnectionError> {
        match &self.listing {
            Some(listing) => {
                self.acquired.set(self.acquired.get() + 1);
                Ok(ListingConnection {
                    listing: listing.clone(),
                })
            }
            None => Err(ConnectionError::unavailable("connection refused")),
        }
    }

    fn release(&self, _connection: ListingConnection) {
        self.released.set(self.released.get() + 1);
    }
}

// =============================================================================
// Schema store
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeSnapshot {
    pub server_id: u64,
    pub position: BinlogPosition,
}

/// Schema store that records every clone request.
#[derive(Default)]
pub struct FakeSchemaStore {
    pub clones: RefCell<Vec<(u64, BinlogPosition)>>,
    pub fail: bool,
}

impl FakeSchemaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            clones: RefCell::new(Vec::new()),
            fail: true,
        }
    }
}

impl SchemaStore for FakeSchemaStore {
    type Snapshot = FakeSnapshot;

    fn clone_at(&self, server_id: u64, position: &BinlogPosition) -> SchemaResult<FakeSnapshot> {
        self.clones.borrow_mut().push((server_id, position.clone()));
        if self.fail {
            return Err(SchemaError::unknown_server(server_id));
        }
        Ok(FakeSnapshot {
            server_id,
            position: position.clone(),
        })
    }
}

// =============================================================================
// Replication engine
// =============================================================================

/// One scripted step of a binlog replay.
#[derive(Debug, Clone)]
pub enum Step {
    /// Data row ending at this offset
    Row(u64),
    /// Heartbeat surfaced directly by the engine
    Heartbeat(u64),
    /// Heartbeat written as a row into the bookkeeping table
    HeartbeatRow(u64, u64),
    /// Engine failure
    Fail(EngineError),
}

/// Per-session record kept by the factory.
pub struct SessionRecord {
    pub file: String,
    pub spec: SessionSpec,
    pub snapshot: FakeSnapshot,
    pub starts: Rc<Cell<u32>>,
    pub stops: Rc<Cell<u32>>,
}

pub struct FakeEngine {
    file: String,
    script: VecDeque<Step>,
    eof_on_start: bool,
    starts: Rc<Cell<u32>>,
    stops: Rc<Cell<u32>>,
    live: Rc<Cell<u32>>,
}

impl ReplicationEngine for FakeEngine {
    fn start(&mut self) -> EngineResult<()> {
        self.starts.set(self.starts.get() + 1);
        if self.eof_on_start {
            return Err(EngineError::end_of_stream("EOF while opening dump"));
        }
        Ok(())
    }

    fn next_event(&mut self) -> EngineResult<Option<ReplicationEvent>> {
        let step = match self.script.pop_front() {
            Some(step) => step,
            // One-shot dumps end with an EOF signal, not a quiet `None`.
            None => return Err(EngineError::end_of_stream("server closed dump")),
        };

        match step {
            Step::Row(offset) => Ok(Some(ReplicationEvent::Row(
                RowRecord::new("shop", "orders", RowKind::Insert, BinlogPosition::at(offset, self.file.clone()))
                    .with_column("id", offset),
            ))),
            Step::Heartbeat(value) => Ok(Some(ReplicationEvent::Heartbeat(value))),
            Step::HeartbeatRow(offset, value) => Ok(Some(ReplicationEvent::Row(
                RowRecord::new("cdc", "heartbeats", RowKind::Update, BinlogPosition::at(offset, self.file.clone()))
                    .with_column("heartbeat", value),
            ))),
            Step::Fail(e) => Err(e),
        }
    }

    fn stop(&mut self) -> EngineResult<()> {
        self.stops.set(self.stops.get() + 1);
        self.live.set(self.live.get() - 1);
        Ok(())
    }
}

/// Builds scripted engines per binlog file and records every session.
#[derive(Default)]
pub struct FakeEngineFactory {
    scripts: HashMap<String, Vec<Step>>,
    eof_on_start: Vec<String>,
    refuse: Vec<String>,
    pub sessions: RefCell<Vec<SessionRecord>>,
    live: Rc<Cell<u32>>,
    pub max_live: Cell<u32>,
}

impl FakeEngineFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(mut self, file: &str, steps: Vec<Step>) -> Self {
        self.scripts.insert(file.to_string(), steps);
        self
    }

    pub fn eof_on_start(mut self, file: &str) -> Self {
        self.eof_on_start.push(file.to_string());
        self
    }

    pub fn refuse(mut self, file: &str) -> Self {
        self.refuse.push(file.to_string());
        self
    }

    /// Files in the order sessions were created.
    pub fn visited(&self) -> Vec<String> {
        self.sessions.borrow().iter().map(|s| s.file.clone()).collect()
    }

    /// Stop counts per session, in creation order.
    pub fn stop_counts(&self) -> Vec<u32> {
        self.sessions.borrow().iter().map(|s| s.stops.get()).collect()
    }
}

impl EngineFactory for FakeEngineFactory {
    type Snapshot = FakeSnapshot;
    type Engine = FakeEngine;

    fn create(&self, snapshot: FakeSnapshot, spec: &SessionSpec) -> EngineResult<FakeEngine> {
        let file = spec.start.file.clone();
        if self.refuse.contains(&file) {
            return Err(EngineError::setup(format!("could not open {}", file)));
        }

        let starts = Rc::new(Cell::new(0));
        let stops = Rc::new(Cell::new(0));
        self.live.set(self.live.get() + 1);
        self.max_live.set(self.max_live.get().max(self.live.get()));

        self.sessions.borrow_mut().push(SessionRecord {
            file: file.clone(),
            spec: spec.clone(),
            snapshot,
            starts: starts.clone(),
            stops: stops.clone(),
        });

        Ok(FakeEngine {
            script: self.scripts.get(&file).cloned().unwrap_or_default().into(),
            eof_on_start: self.eof_on_start.contains(&file),
            file,
            starts,
            stops,
            live: self.live.clone(),
        })
    }
}
