//! Recovery observer
//!
//! Observability describes what recovery did; it never changes what
//! recovery does. Emission cannot fail.

use tracing::{debug, error, info, warn};

use super::events::RecoveryEvent;

const TARGET: &str = "binlog_recovery::recovery";

/// Logs recovery events and keeps them for later inspection.
#[derive(Debug, Default)]
pub struct RecoveryObserver {
    events: Vec<RecoveryEvent>,
}

impl RecoveryObserver {
    /// Create a new observer.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Log and record an event.
    pub fn emit(&mut self, event: RecoveryEvent) {
        log_event(&event);
        self.events.push(event);
    }

    /// All emitted events, oldest first.
    pub fn events(&self) -> &[RecoveryEvent] {
        &self.events
    }

    /// Clear all events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

fn log_event(event: &RecoveryEvent) {
    let name = event.event_name();
    match event {
        RecoveryEvent::Started {
            attempt_id,
            old_server_id,
            old_position,
            heartbeat,
        } => info!(
            target: TARGET,
            event = name,
            %attempt_id,
            old_server_id,
            file = %old_position.file,
            position = old_position.offset,
            heartbeat,
            "attempting to recover from master change"
        ),
        RecoveryEvent::CatalogListed { attempt_id, candidates } => debug!(
            target: TARGET,
            event = name,
            %attempt_id,
            candidates,
            "listed candidate binary logs"
        ),
        RecoveryEvent::ScanStarted { attempt_id, start } => debug!(
            target: TARGET,
            event = name,
            %attempt_id,
            start = %start,
            "scanning binlog"
        ),
        RecoveryEvent::ScanExhausted {
            attempt_id,
            file,
            rows_scanned,
        } => debug!(
            target: TARGET,
            event = name,
            %attempt_id,
            file = %file,
            rows_scanned,
            "heartbeat not in binlog"
        ),
        RecoveryEvent::ScanFailed {
            attempt_id,
            file,
            reason,
        } => warn!(
            target: TARGET,
            event = name,
            %attempt_id,
            file = %file,
            reason = %reason,
            "binlog scan failed, moving to older binlog"
        ),
        RecoveryEvent::Recovered { attempt_id, position } => info!(
            target: TARGET,
            event = name,
            %attempt_id,
            position = %position,
            "recovered from master change"
        ),
        RecoveryEvent::HeartbeatNotFound {
            attempt_id,
            heartbeat,
            candidates,
        } => warn!(
            target: TARGET,
            event = name,
            %attempt_id,
            heartbeat,
            candidates,
            "could not recover from master change"
        ),
        RecoveryEvent::Aborted { attempt_id, reason } => error!(
            target: TARGET,
            event = name,
            %attempt_id,
            reason = %reason,
            "master change recovery aborted"
        ),
    }
}
