//! Connection provider contract
//!
//! The connection pool itself lives outside this crate. Recovery only needs
//! to check a connection out, run one listing query, and hand it back.

use std::collections::HashMap;
use std::fmt;

/// Connection error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionErrorKind {
    /// No connection could be obtained from the pool
    Unavailable,
    /// The server rejected or failed the query
    QueryFailed,
}

/// Error raised by a connection provider or connection
#[derive(Debug, Clone)]
pub struct ConnectionError {
    /// Error kind
    pub kind: ConnectionErrorKind,
    /// Error message
    pub message: String,
}

impl ConnectionError {
    /// Create a new connection error.
    pub fn new(kind: ConnectionErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Create an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(ConnectionErrorKind::Unavailable, message)
    }

    /// Create a query failed error.
    pub fn query_failed(message: impl Into<String>) -> Self {
        Self::new(ConnectionErrorKind::QueryFailed, message)
    }
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConnectionError({:?}): {}", self.kind, self.message)
    }
}

impl std::error::Error for ConnectionError {}

/// One row of a query result, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryRow {
    columns: HashMap<String, String>,
}

impl QueryRow {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style column setter.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.columns.insert(column.into(), value.into());
        self
    }

    /// Get a column value by name.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns.get(column).map(String::as_str)
    }
}

/// A live connection to the new master
pub trait Connection {
    /// Execute a query and return all result rows in server order.
    fn query(&mut self, sql: &str) -> Result<Vec<QueryRow>, ConnectionError>;
}

/// Source of pooled connections
pub trait ConnectionProvider {
    /// Connection type handed out by this provider
    type Connection: Connection;

    /// Check a connection out of the pool.
    fn acquire(&self) -> Result<Self::Connection, ConnectionError>;

    /// Return a connection to the pool.
    fn release(&self, connection: Self::Connection);
}

/// A checked-out connection that returns itself to its provider on drop.
pub struct PooledConnection<'a, P: ConnectionProvider> {
    provider: &'a P,
    connection: Option<P::Connection>,
}

impl<'a, P: ConnectionProvider> PooledConnection<'a, P> {
    /// Check a connection out of `provider`.
    pub fn acquire(provider: &'a P) -> Result<Self, ConnectionError> {
        let connection = provider.acquire()?;
        Ok(Self {
            provider,
            connection: Some(connection),
        })
    }

    /// Execute a query on the held connection.
    pub fn query(&mut self, sql: &str) -> Result<Vec<QueryRow>, ConnectionError> {
        match self.connection.as_mut() {
            Some(conn) => conn.query(sql),
            None => Err(ConnectionError::unavailable("connection already released")),
        }
    }
}

impl<P: ConnectionProvider> Drop for PooledConnection<'_, P> {
    fn drop(&mut self) {
        if let Some(conn) = self.connection.take() {
            self.provider.release(conn);
        }
    }
}
