//! Heartbeat row detection
//!
//! The pipeline writes its heartbeats as ordinary rows into a bookkeeping
//! table on the master. When those rows come back through the binlog they
//! mark "everything before here was delivered"; they are not data.

use serde_json::Value;

use super::engine::{RowKind, RowRecord};
use super::errors::{EngineError, EngineResult};
use crate::config::RecoveryConfig;

/// Location of heartbeat rows in the binlog stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeartbeatSource {
    /// Bookkeeping database
    pub database: String,
    /// Heartbeat table
    pub table: String,
    /// Column holding the heartbeat value
    pub column: String,
}

impl HeartbeatSource {
    /// Create a heartbeat source.
    pub fn new(
        database: impl Into<String>,
        table: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self {
            database: database.into(),
            table: table.into(),
            column: column.into(),
        }
    }

    /// Heartbeat source described by a recovery config.
    pub fn from_config(config: &RecoveryConfig) -> Self {
        Self::new(
            config.schema_database.clone(),
            config.heartbeat_table.clone(),
            config.heartbeat_column.clone(),
        )
    }

    /// Whether `row` belongs to the heartbeat table.
    pub fn is_heartbeat_row(&self, row: &RowRecord) -> bool {
        row.database == self.database && row.table == self.table
    }

    /// Heartbeat value carried by `row`.
    ///
    /// Returns `Ok(None)` for rows outside the heartbeat table and for
    /// deletes, which carry no new heartbeat. A heartbeat row without a
    /// readable value is a decode error.
    pub fn value_of(&self, row: &RowRecord) -> EngineResult<Option<u64>> {
        if !self.is_heartbeat_row(row) || row.kind == RowKind::Delete {
            return Ok(None);
        }

        let value = row.data.get(&self.column).ok_or_else(|| {
            EngineError::decode(format!(
                "heartbeat row at {} has no `{}` column",
                row.position, self.column
            ))
        })?;

        match value {
            Value::Number(n) => n.as_u64().map(Some).ok_or_else(|| {
                EngineError::decode(format!(
                    "heartbeat at {} is not an unsigned integer: {}",
                    row.position, n
                ))
            }),
            Value::String(s) => s.parse::<u64>().map(Some).map_err(|e| {
                EngineError::decode(format!(
                    "heartbeat at {} is not an unsigned integer: {:?} ({})",
                    row.position, s, e
                ))
            }),
            other => Err(EngineError::decode(format!(
                "heartbeat at {} has unexpected type: {}",
                row.position, other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binlog::BinlogPosition;
    use crate::replication::EngineErrorKind;

    fn source() -> HeartbeatSource {
        HeartbeatSource::new("cdc", "heartbeats", "heartbeat")
    }

    fn heartbeat_row(kind: RowKind, value: Value) -> RowRecord {
        RowRecord::new("cdc", "heartbeats", kind, BinlogPosition::at(300, "log.1"))
            .with_column("heartbeat", value)
    }

    #[test]
    fn test_numeric_heartbeat() {
        let row = heartbeat_row(RowKind::Insert, Value::from(1_700_000_000_123u64));
        assert_eq!(source().value_of(&row).unwrap(), Some(1_700_000_000_123));
    }

    #[test]
    fn test_string_heartbeat() {
        let row = heartbeat_row(RowKind::Update, Value::from("42"));
        assert_eq!(source().value_of(&row).unwrap(), Some(42));
    }

    #[test]
    fn test_other_tables_are_not_heartbeats() {
        let row = RowRecord::new("shop", "heartbeats", RowKind::Insert, BinlogPosition::at(9, "log.1"))
            .with_column("heartbeat", 42);
        assert!(!source().is_heartbeat_row(&row));
        assert_eq!(source().value_of(&row).unwrap(), None);
    }

    #[test]
    fn test_delete_carries_no_heartbeat() {
        let row = heartbeat_row(RowKind::Delete, Value::from(42));
        assert!(source().is_heartbeat_row(&row));
        assert_eq!(source().value_of(&row).unwrap(), None);
    }

    #[test]
    fn test_missing_column_is_decode_error() {
        let row = RowRecord::new("cdc", "heartbeats", RowKind::Insert, BinlogPosition::at(9, "log.1"));
        let err = source().value_of(&row).unwrap_err();
        assert_eq!(err.kind, EngineErrorKind::Decode);
    }

    #[test]
    fn test_negative_heartbeat_is_decode_error() {
        let row = heartbeat_row(RowKind::Insert, Value::from(-1));
        assert!(source().value_of(&row).is_err());
    }

    #[test]
    fn test_from_config() {
        let config = RecoveryConfig {
            schema_database: "meta".to_string(),
            ..Default::default()
        };
        let source = HeartbeatSource::from_config(&config);
        assert_eq!(source, HeartbeatSource::new("meta", "heartbeats", "heartbeat"));
    }
}
