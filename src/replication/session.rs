//! Ephemeral replication session
//!
//! Replays one binary log file through the engine without persisting
//! anything, and pairs every row with the heartbeat seen as of that row.
//!
//! # Lifecycle
//!
//! A session owns its engine from the moment it is built. The engine is
//! stopped exactly once: by `stop()` if the caller gets there, otherwise by
//! `Drop`. This holds on every exit path, including a failed `start()`.

use tracing::{debug, warn};

use super::engine::{ReplicationEngine, ReplicationEvent, RowRecord, SessionSpec};
use super::errors::EngineResult;
use crate::binlog::BinlogPosition;

/// A row paired with the heartbeat observed before it in this session.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservedRow {
    /// Decoded row
    pub row: RowRecord,
    /// Last heartbeat seen before `row`, if any
    pub heartbeat: Option<u64>,
}

/// One-shot, single-file replay session
pub struct EphemeralSession<E: ReplicationEngine> {
    engine: E,
    spec: SessionSpec,
    last_heartbeat: Option<u64>,
    rows_read: u64,
    exhausted: bool,
    stopped: bool,
}

impl<E: ReplicationEngine> EphemeralSession<E> {
    /// Take ownership of `engine` and start it.
    ///
    /// End of stream while starting is the normal outcome for a file with
    /// nothing left to dump; the session then drains whatever the engine
    /// already buffered. Any other start failure is returned after the
    /// engine has been stopped.
    pub fn start(engine: E, spec: SessionSpec) -> EngineResult<Self> {
        let mut session = Self {
            engine,
            spec,
            last_heartbeat: None,
            rows_read: 0,
            exhausted: false,
            stopped: false,
        };

        match session.engine.start() {
            Ok(()) => {}
            Err(e) if e.is_end_of_stream() => {
                debug!(
                    target: "binlog_recovery::session",
                    start = %session.spec.start,
                    "end of stream while starting one-shot dump"
                );
            }
            // `session` drops here and stops the engine.
            Err(e) => return Err(e),
        }

        Ok(session)
    }

    /// Position this session started reading from.
    pub fn start_position(&self) -> &BinlogPosition {
        &self.spec.start
    }

    /// Last heartbeat seen so far in this session.
    pub fn last_heartbeat(&self) -> Option<u64> {
        self.last_heartbeat
    }

    /// Number of data rows returned so far.
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Whether the stream has ended.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Next data row with its heartbeat, or `None` once the file is done.
    ///
    /// Heartbeats are folded into session state and never returned as rows.
    pub fn next_row(&mut self) -> EngineResult<Option<ObservedRow>> {
        if self.exhausted || self.stopped {
            return Ok(None);
        }

        loop {
            let event = match self.engine.next_event() {
                Ok(Some(event)) => event,
                Ok(None) => {
                    self.exhausted = true;
                    return Ok(None);
                }
                Err(e) if e.is_end_of_stream() => {
                    self.exhausted = true;
                    return Ok(None);
                }
                Err(e) => return Err(e),
            };

            match event {
                ReplicationEvent::Heartbeat(value) => self.observe_heartbeat(value),
                ReplicationEvent::Row(row) => {
                    if self.spec.heartbeat.is_heartbeat_row(&row) {
                        if let Some(value) = self.spec.heartbeat.value_of(&row)? {
                            self.observe_heartbeat(value);
                        }
                        continue;
                    }

                    self.rows_read += 1;
                    return Ok(Some(ObservedRow {
                        row,
                        heartbeat: self.last_heartbeat,
                    }));
                }
            }
        }
    }

    /// Stop the engine now and surface any release error.
    pub fn stop(mut self) -> EngineResult<()> {
        self.release()
    }

    fn observe_heartbeat(&mut self, value: u64) {
        self.last_heartbeat = Some(value);
    }

    fn release(&mut self) -> EngineResult<()> {
        if self.stopped {
            return Ok(());
        }
        self.stopped = true;
        self.engine.stop()
    }
}

impl<E: ReplicationEngine> Drop for EphemeralSession<E> {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!(
                target: "binlog_recovery::session",
                start = %self.spec.start,
                error = %e,
                "failed to stop replication session"
            );
        }
    }
}
