//! Binlog positions
//!
//! A position names a byte offset inside one binary log file. Offsets are
//! only comparable within the same file; ordering across files comes from
//! the server's catalog listing, never from the file names themselves.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Size of the magic header at the start of every binary log file.
///
/// Replay of a whole file starts here, not at offset 0.
pub const BINLOG_HEADER_OFFSET: u64 = 4;

/// Byte-exact location within a named binary log file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BinlogPosition {
    /// Binary log file name, e.g. `mysql-bin.000042`
    pub file: String,
    /// Byte offset within `file`
    pub offset: u64,
}

impl BinlogPosition {
    /// Create a position at `offset` within `file`.
    pub fn at(offset: u64, file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            offset,
        }
    }

    /// Position of the first event in `file`, just past the magic header.
    pub fn file_start(file: impl Into<String>) -> Self {
        Self::at(BINLOG_HEADER_OFFSET, file)
    }

    /// Whether this position is in the same file as `other`.
    pub fn same_file(&self, other: &BinlogPosition) -> bool {
        self.file == other.file
    }

    /// Returns true if `self` is strictly before `other` in the same file.
    ///
    /// Positions in different files are not comparable and always yield
    /// `None`.
    pub fn precedes(&self, other: &BinlogPosition) -> Option<bool> {
        if self.same_file(other) {
            Some(self.offset < other.offset)
        } else {
            None
        }
    }
}

impl fmt::Display for BinlogPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.offset)
    }
}
