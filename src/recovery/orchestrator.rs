//! Master recovery orchestrator
//!
//! Finds the resume position on a new master after failover.
//!
//! # Sequence (strict order)
//!
//! 1. List binary logs on the new master (fatal on failure)
//! 2. Visit candidates newest first
//! 3. Per candidate: clone the schema at the *old* server id and *old*
//!    position, start a one-shot session at the candidate, scan it
//! 4. First match wins; a failed candidate is logged and skipped
//! 5. Every candidate exhausted: `HeartbeatNotFound`
//!
//! Non-Responsibilities:
//! - Does not detect master changes
//! - Does not persist the recovered position
//! - Does not retry a candidate or an attempt
//!
//! Exactly one session exists at a time. Nothing durable is written.

use chrono::Utc;
use uuid::Uuid;

use super::errors::{RecoveryError, RecoveryResult};
use super::report::{CandidateReport, CandidateResult, RecoveryOutcome, RecoveryReport};
use super::request::RecoveryRequest;
use super::scanner::{HeartbeatScanner, ScanOutcome};
use crate::binlog::{BinlogCatalog, BinlogPosition, ConnectionProvider};
use crate::config::RecoveryConfig;
use crate::observability::{RecoveryEvent, RecoveryObserver};
use crate::replication::{EngineFactory, EphemeralSession, HeartbeatSource, SessionSpec};
use crate::schema::SchemaStore;

/// Drives recovery of a resume position after a master change.
pub struct MasterRecovery<'a, P, S, F>
where
    P: ConnectionProvider,
    S: SchemaStore,
    F: EngineFactory<Snapshot = S::Snapshot>,
{
    config: &'a RecoveryConfig,
    connections: &'a P,
    schemas: &'a S,
    engines: &'a F,
    observer: RecoveryObserver,
}

impl<'a, P, S, F> MasterRecovery<'a, P, S, F>
where
    P: ConnectionProvider,
    S: SchemaStore,
    F: EngineFactory<Snapshot = S::Snapshot>,
{
    /// Create a recovery driver over the given collaborators.
    pub fn new(config: &'a RecoveryConfig, connections: &'a P, schemas: &'a S, engines: &'a F) -> Self {
        Self {
            config,
            connections,
            schemas,
            engines,
            observer: RecoveryObserver::new(),
        }
    }

    /// Events emitted so far, across all attempts.
    pub fn observer(&self) -> &RecoveryObserver {
        &self.observer
    }

    /// Find the resume position for `request`.
    pub fn recover(&mut self, request: &RecoveryRequest) -> RecoveryResult<RecoveryOutcome> {
        self.recover_with_report(request).map(|report| report.outcome)
    }

    /// Find the resume position for `request` and report every candidate
    /// visited.
    ///
    /// # Errors
    ///
    /// - `CatalogUnavailable` if the new master's binlogs cannot be listed;
    ///   no session is started
    /// - `SchemaUnavailable` if the old master's schema cannot be cloned
    ///
    /// Candidate failures are not errors here; they appear in the report.
    pub fn recover_with_report(&mut self, request: &RecoveryRequest) -> RecoveryResult<RecoveryReport> {
        let attempt_id = Uuid::new_v4();
        let started_at = Utc::now();

        self.observer.emit(RecoveryEvent::Started {
            attempt_id,
            old_server_id: request.old_server_id,
            old_position: request.old_position.clone(),
            heartbeat: request.target_heartbeat,
        });

        let candidates = match BinlogCatalog::new(self.connections).candidates() {
            Ok(candidates) => candidates,
            Err(e) => {
                let err = RecoveryError::from(e);
                self.abort(attempt_id, &err);
                return Err(err);
            }
        };

        self.observer.emit(RecoveryEvent::CatalogListed {
            attempt_id,
            candidates: candidates.len(),
        });

        let scanner = HeartbeatScanner::new(request.target_heartbeat);
        let heartbeat = HeartbeatSource::from_config(self.config);
        let mut visited = Vec::with_capacity(candidates.len());
        let mut outcome = RecoveryOutcome::HeartbeatNotFound;

        for start in candidates.iter().rev() {
            self.observer.emit(RecoveryEvent::ScanStarted {
                attempt_id,
                start: start.clone(),
            });

            let result = match self.scan_candidate(request, start, &scanner, &heartbeat) {
                Ok(ScanOutcome::Matched(position)) => CandidateResult::Matched { position },
                Ok(ScanOutcome::Exhausted { rows_scanned }) => {
                    self.observer.emit(RecoveryEvent::ScanExhausted {
                        attempt_id,
                        file: start.file.clone(),
                        rows_scanned,
                    });
                    CandidateResult::Exhausted { rows_scanned }
                }
                Err(e) if !e.is_fatal() => {
                    self.observer.emit(RecoveryEvent::ScanFailed {
                        attempt_id,
                        file: start.file.clone(),
                        reason: e.to_string(),
                    });
                    CandidateResult::Failed {
                        code: e.code(),
                        reason: e.to_string(),
                    }
                }
                Err(e) => {
                    self.abort(attempt_id, &e);
                    return Err(e);
                }
            };

            let matched = match &result {
                CandidateResult::Matched { position } => Some(position.clone()),
                _ => None,
            };
            visited.push(CandidateReport {
                start: start.clone(),
                result,
            });

            if let Some(position) = matched {
                outcome = RecoveryOutcome::Recovered { position };
                break;
            }
        }

        match &outcome {
            RecoveryOutcome::Recovered { position } => {
                self.observer.emit(RecoveryEvent::Recovered {
                    attempt_id,
                    position: position.clone(),
                });
            }
            RecoveryOutcome::HeartbeatNotFound => {
                self.observer.emit(RecoveryEvent::HeartbeatNotFound {
                    attempt_id,
                    heartbeat: request.target_heartbeat,
                    candidates: visited.len(),
                });
            }
        }

        Ok(RecoveryReport {
            attempt_id,
            request: request.clone(),
            catalog_size: candidates.len(),
            candidates: visited,
            outcome,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Clone the old schema, start a session at `start`, and scan it.
    fn scan_candidate(
        &self,
        request: &RecoveryRequest,
        start: &BinlogPosition,
        scanner: &HeartbeatScanner,
        heartbeat: &HeartbeatSource,
    ) -> RecoveryResult<ScanOutcome> {
        // Schema as of the old master at the last confirmed position; the
        // candidate's own position means nothing to the old history.
        let snapshot = self
            .schemas
            .clone_at(request.old_server_id, &request.old_position)
            .map_err(|e| RecoveryError::SchemaUnavailable {
                server_id: request.old_server_id,
                position: request.old_position.clone(),
                source: e,
            })?;

        let spec = SessionSpec::one_shot(
            start.clone(),
            self.config.replication.clone(),
            heartbeat.clone(),
        );

        let engine = self
            .engines
            .create(snapshot, &spec)
            .map_err(|e| RecoveryError::candidate_scan_failed(start.file.clone(), 0, e))?;

        let session = EphemeralSession::start(engine, spec)
            .map_err(|e| RecoveryError::candidate_scan_failed(start.file.clone(), 0, e))?;

        scanner.scan(session)
    }

    fn abort(&mut self, attempt_id: Uuid, err: &RecoveryError) {
        self.observer.emit(RecoveryEvent::Aborted {
            attempt_id,
            reason: err.to_string(),
        });
    }
}
