//! Master recovery
//!
//! After a failover the pipeline's stored position names a file and offset
//! on the old master, which mean nothing on the new one. Recovery finds the
//! pipeline's own last delivered heartbeat in the new master's binlogs and
//! resumes right after it.
//!
//! # Sequence
//!
//! 1. List the new master's binlogs
//! 2. Replay them newest first, one one-shot session at a time
//! 3. Stop at the first row carrying the target heartbeat
//!
//! # Invariants
//!
//! - One session at a time, never reused
//! - Every session stopped exactly once
//! - Schema snapshots always cloned at the old server id and position
//! - End of stream is never an error
//! - No match is an explicit outcome; callers must not resume blindly

mod errors;
mod orchestrator;
mod report;
mod request;
mod scanner;

pub use errors::{RecoveryError, RecoveryResult, Severity};
pub use orchestrator::MasterRecovery;
pub use report::{CandidateReport, CandidateResult, RecoveryOutcome, RecoveryReport};
pub use request::RecoveryRequest;
pub use scanner::{HeartbeatScanner, ScanOutcome};
