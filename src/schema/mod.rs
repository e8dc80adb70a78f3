//! Schema snapshot contract
//!
//! Row decoding needs the table definitions that were in force when the
//! rows were written. During master recovery that is the schema as the
//! pipeline knew it on the *old* master at the last confirmed position,
//! not the new master's current schema.
//!
//! The store's DDL tracking lives elsewhere; recovery only clones views
//! out of it.

mod errors;

pub use errors::{SchemaError, SchemaErrorKind, SchemaResult};

use crate::binlog::BinlogPosition;

/// Source of independent schema snapshots
pub trait SchemaStore {
    /// Snapshot handed to a replication session. Owned by the session;
    /// nothing done to it is visible to the store or to other snapshots.
    type Snapshot;

    /// Clone the schema as of `position` on server `server_id`.
    fn clone_at(&self, server_id: u64, position: &BinlogPosition) -> SchemaResult<Self::Snapshot>;
}
