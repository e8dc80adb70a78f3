//! Heartbeat scanner
//!
//! Drains one session looking for the first row whose heartbeat, as of that
//! row, equals the target. The recoverable position is that row's position:
//! the heartbeat is carried forward onto later rows, it does not mark a
//! position of its own.
//!
//! The session is stopped before `scan` returns, whatever the outcome.

use tracing::warn;

use super::errors::{RecoveryError, RecoveryResult};
use crate::binlog::BinlogPosition;
use crate::replication::{EngineResult, EphemeralSession, ReplicationEngine};

/// Result of scanning one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Target heartbeat found; resume here
    Matched(BinlogPosition),
    /// Stream ended without the target heartbeat
    Exhausted {
        /// Data rows read
        rows_scanned: u64,
    },
}

/// Scans sessions for one target heartbeat.
#[derive(Debug, Clone, Copy)]
pub struct HeartbeatScanner {
    target: u64,
}

impl HeartbeatScanner {
    /// Create a scanner for `target`.
    pub fn new(target: u64) -> Self {
        Self { target }
    }

    /// Heartbeat this scanner looks for.
    pub fn target(&self) -> u64 {
        self.target
    }

    /// Scan `session` to a match or to end of stream.
    ///
    /// Engine failures become `CandidateScanFailed`. A failure to stop the
    /// session after a clean scan is logged and does not change the outcome.
    pub fn scan<E: ReplicationEngine>(
        &self,
        mut session: EphemeralSession<E>,
    ) -> RecoveryResult<ScanOutcome> {
        let file = session.start_position().file.clone();
        let drained = self.drain(&mut session);
        let rows_scanned = session.rows_read();

        if let Err(e) = session.stop() {
            warn!(
                target: "binlog_recovery::scanner",
                file = %file,
                error = %e,
                "failed to stop replication session"
            );
        }

        drained.map_err(|e| RecoveryError::candidate_scan_failed(file, rows_scanned, e))
    }

    fn drain<E: ReplicationEngine>(
        &self,
        session: &mut EphemeralSession<E>,
    ) -> EngineResult<ScanOutcome> {
        while let Some(observed) = session.next_row()? {
            if observed.heartbeat == Some(self.target) {
                return Ok(ScanOutcome::Matched(observed.row.position));
            }
        }

        Ok(ScanOutcome::Exhausted {
            rows_scanned: session.rows_read(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MysqlEndpoint;
    use crate::replication::{
        EngineError, HeartbeatSource, ReplicationEvent, RowKind, RowRecord, SessionSpec,
    };
    use std::cell::Cell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    struct ScriptedEngine {
        script: VecDeque<EngineResult<Option<ReplicationEvent>>>,
        stops: Rc<Cell<u32>>,
        stop_error: bool,
    }

    impl ReplicationEngine for ScriptedEngine {
        fn start(&mut self) -> EngineResult<()> {
            Ok(())
        }

        fn next_event(&mut self) -> EngineResult<Option<ReplicationEvent>> {
            self.script.pop_front().unwrap_or(Ok(None))
        }

        fn stop(&mut self) -> EngineResult<()> {
            self.stops.set(self.stops.get() + 1);
            if self.stop_error {
                Err(EngineError::connection("socket already closed"))
            } else {
                Ok(())
            }
        }
    }

    fn session(
        script: Vec<EngineResult<Option<ReplicationEvent>>>,
    ) -> (EphemeralSession<ScriptedEngine>, Rc<Cell<u32>>) {
        session_with_stop_error(script, false)
    }

    fn session_with_stop_error(
        script: Vec<EngineResult<Option<ReplicationEvent>>>,
        stop_error: bool,
    ) -> (EphemeralSession<ScriptedEngine>, Rc<Cell<u32>>) {
        let stops = Rc::new(Cell::new(0));
        let engine = ScriptedEngine {
            script: script.into(),
            stops: stops.clone(),
            stop_error,
        };
        let spec = SessionSpec::one_shot(
            BinlogPosition::file_start("log.2"),
            MysqlEndpoint::default(),
            HeartbeatSource::new("cdc", "heartbeats", "heartbeat"),
        );
        (EphemeralSession::start(engine, spec).unwrap(), stops)
    }

    fn row(offset: u64) -> EngineResult<Option<ReplicationEvent>> {
        Ok(Some(ReplicationEvent::Row(RowRecord::new(
            "shop",
            "orders",
            RowKind::Insert,
            BinlogPosition::at(offset, "log.2"),
        ))))
    }

    fn heartbeat(value: u64) -> EngineResult<Option<ReplicationEvent>> {
        Ok(Some(ReplicationEvent::Heartbeat(value)))
    }

    #[test]
    fn test_match_returns_position_of_row_after_heartbeat() {
        let (session, stops) = session(vec![
            row(100),
            heartbeat(41),
            row(200),
            heartbeat(42),
            row(300),
            row(400),
        ]);

        let outcome = HeartbeatScanner::new(42).scan(session).unwrap();

        assert_eq!(outcome, ScanOutcome::Matched(BinlogPosition::at(300, "log.2")));
        assert_eq!(stops.get(), 1);
    }

    #[test]
    fn test_heartbeat_without_following_row_is_not_a_match() {
        let (session, _) = session(vec![row(100), heartbeat(42)]);

        let outcome = HeartbeatScanner::new(42).scan(session).unwrap();

        assert_eq!(outcome, ScanOutcome::Exhausted { rows_scanned: 1 });
    }

    #[test]
    fn test_exhausted_without_match() {
        let (session, stops) = session(vec![
            row(100),
            heartbeat(41),
            row(200),
            Err(EngineError::end_of_stream("EOF")),
        ]);

        let outcome = HeartbeatScanner::new(42).scan(session).unwrap();

        assert_eq!(outcome, ScanOutcome::Exhausted { rows_scanned: 2 });
        assert_eq!(stops.get(), 1);
    }

    #[test]
    fn test_engine_failure_is_candidate_failure() {
        let (session, stops) = session(vec![
            row(100),
            row(200),
            row(300),
            Err(EngineError::decode("table map id 91 unknown")),
        ]);

        let err = HeartbeatScanner::new(42).scan(session).unwrap_err();

        match &err {
            RecoveryError::CandidateScanFailed {
                file,
                rows_scanned,
                source,
            } => {
                assert_eq!(file, "log.2");
                assert_eq!(*rows_scanned, 3);
                assert!(!source.is_end_of_stream());
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!err.is_fatal());
        assert_eq!(stops.get(), 1);
    }

    #[test]
    fn test_stop_failure_does_not_hide_match() {
        let (session, stops) = session_with_stop_error(vec![heartbeat(42), row(150)], true);

        let outcome = HeartbeatScanner::new(42).scan(session).unwrap();

        assert_eq!(outcome, ScanOutcome::Matched(BinlogPosition::at(150, "log.2")));
        assert_eq!(stops.get(), 1);
    }
}
