//! WAL record definitions
//!
//! Each record renders to exactly one line of pipe-delimited fields.

use std::fmt;

use crate::storage::row::FIELD_SEPARATOR;

use super::TxId;

/// Delimiter between record fields
pub const FIELD_DELIMITER: char = '|';

/// A single WAL record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxRecord {
    /// Start of a mutating operation
    Begin { tx: TxId },

    /// Table creation with ordered column names
    Create {
        tx: TxId,
        table: String,
        columns: Vec<String>,
    },

    /// Row insertion with ordered values
    Insert {
        tx: TxId,
        table: String,
        values: Vec<String>,
    },

    /// Successful completion of the operation
    Commit { tx: TxId },
}

impl TxRecord {
    /// Record kind as written in the first field
    pub fn kind(&self) -> &'static str {
        match self {
            TxRecord::Begin { .. } => "BEGIN",
            TxRecord::Create { .. } => "CREATE",
            TxRecord::Insert { .. } => "INSERT",
            TxRecord::Commit { .. } => "COMMIT",
        }
    }

    /// Transaction the record belongs to
    pub fn tx(&self) -> TxId {
        match self {
            TxRecord::Begin { tx }
            | TxRecord::Create { tx, .. }
            | TxRecord::Insert { tx, .. }
            | TxRecord::Commit { tx } => *tx,
        }
    }

    /// Render as a newline-terminated log line
    pub fn to_line(&self) -> String {
        format!("{}\n", self)
    }
}

impl fmt::Display for TxRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = FIELD_DELIMITER;
        match self {
            TxRecord::Begin { tx } | TxRecord::Commit { tx } => {
                write!(f, "{}{}{}", self.kind(), d, tx)
            }
            TxRecord::Create { tx, table, columns: list }
            | TxRecord::Insert { tx, table, values: list } => write!(
                f,
                "{}{}{}{}{}{}{}",
                self.kind(),
                d,
                tx,
                d,
                table,
                d,
                list.join(FIELD_SEPARATOR.to_string().as_str())
            ),
        }
    }
}
