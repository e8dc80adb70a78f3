//! binlog-recovery - master failover recovery for a MySQL binlog CDC pipeline
//!
//! When the upstream primary changes, the pipeline's stored binlog position
//! no longer resolves. This crate locates the pipeline's last delivered
//! heartbeat in the new master's binary logs and returns the position to
//! resume streaming from.
//!
//! The replication engine, schema store, and connection pool are external;
//! this crate defines the traits they implement.

pub mod binlog;
pub mod config;
pub mod observability;
pub mod recovery;
pub mod replication;
pub mod schema;

pub use binlog::BinlogPosition;
pub use config::RecoveryConfig;
pub use recovery::{MasterRecovery, RecoveryError, RecoveryOutcome, RecoveryReport, RecoveryRequest};
