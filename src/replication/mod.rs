//! Replication Subsystem
//!
//! Recovery drives the streaming replication engine in a bounded mode:
//! - One binary log file per session, read to end of file and no further
//! - Nothing decoded here is persisted or shipped downstream
//! - Heartbeat state is per session and starts empty
//!
//! The engine's decoding internals are out of scope; `engine` defines the
//! contract it fulfils.

mod engine;
mod errors;
mod heartbeat;
mod session;

pub use engine::{
    EngineFactory, ReplicationEngine, ReplicationEvent, RowKind, RowRecord, SessionSpec,
};
pub use errors::{EngineError, EngineErrorKind, EngineResult};
pub use heartbeat::HeartbeatSource;
pub use session::{EphemeralSession, ObservedRow};
