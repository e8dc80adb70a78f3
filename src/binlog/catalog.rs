//! Binlog catalog reader
//!
//! Lists the binary logs retained by the new master, in the order the
//! server reports them. No filtering, no deduplication, no sorting.

use thiserror::Error;
use tracing::debug;

use super::connection::{ConnectionError, ConnectionErrorKind, ConnectionProvider, PooledConnection};
use super::position::BinlogPosition;

/// Query that enumerates retained binary logs
pub const LIST_BINARY_LOGS: &str = "SHOW BINARY LOGS";

/// Result column holding the log file name
pub const LOG_NAME_COLUMN: &str = "Log_name";

/// Failure to enumerate binary logs on the new master
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// Connection could not be checked out
    #[error("no connection to the new master: {0}")]
    ConnectionUnavailable(String),

    /// Listing query failed
    #[error("`{query}` failed: {message}")]
    QueryFailed {
        /// Query text
        query: &'static str,
        /// Server message
        message: String,
    },

    /// A result row had no log name column
    #[error("row {row} of the binlog listing has no `{column}` column")]
    MissingColumn {
        /// Zero-based row index
        row: usize,
        /// Expected column
        column: &'static str,
    },
}

impl From<ConnectionError> for CatalogError {
    fn from(err: ConnectionError) -> Self {
        match err.kind {
            ConnectionErrorKind::Unavailable => CatalogError::ConnectionUnavailable(err.message),
            ConnectionErrorKind::QueryFailed => CatalogError::QueryFailed {
                query: LIST_BINARY_LOGS,
                message: err.message,
            },
        }
    }
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Reads the binlog file listing from the new master.
pub struct BinlogCatalog<'a, P: ConnectionProvider> {
    provider: &'a P,
}

impl<'a, P: ConnectionProvider> BinlogCatalog<'a, P> {
    /// Create a catalog reader over `provider`.
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    /// List binary log file names, oldest to newest as reported.
    ///
    /// The connection is held only for the listing query and is returned
    /// to the pool on every path.
    pub fn list_binlogs(&self) -> CatalogResult<Vec<String>> {
        let mut conn = PooledConnection::acquire(self.provider)?;
        let rows = conn.query(LIST_BINARY_LOGS)?;

        let mut files = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let name = row.get(LOG_NAME_COLUMN).ok_or(CatalogError::MissingColumn {
                row: i,
                column: LOG_NAME_COLUMN,
            })?;
            files.push(name.to_string());
        }

        debug!(
            target: "binlog_recovery::catalog",
            count = files.len(),
            "listed binary logs"
        );

        Ok(files)
    }

    /// One candidate per listed file, anchored just past the magic header.
    pub fn candidates(&self) -> CatalogResult<Vec<BinlogPosition>> {
        Ok(self
            .list_binlogs()?
            .into_iter()
            .map(BinlogPosition::file_start)
            .collect())
    }
}
