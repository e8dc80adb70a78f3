//! Binary log addressing and catalog access on the new master
//!
//! File names and offsets from the old master do not resolve here. The only
//! ordering recovery trusts across files is the order `SHOW BINARY LOGS`
//! returns.

mod catalog;
mod connection;
mod position;

pub use catalog::{BinlogCatalog, CatalogError, CatalogResult, LIST_BINARY_LOGS, LOG_NAME_COLUMN};
pub use connection::{
    Connection, ConnectionError, ConnectionErrorKind, ConnectionProvider, PooledConnection,
    QueryRow,
};
pub use position::{BinlogPosition, BINLOG_HEADER_OFFSET};
