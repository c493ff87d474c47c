//! Write-Ahead Log (WAL) Module
//!
//! Records the intent and completion of every mutating operation.
//!
//! ## Responsibilities
//! - Append one line per record, synced before returning
//! - Serialize concurrent writers so records never interleave
//! - Issue transaction IDs
//!
//! The log is write-only: nothing reads or replays it.
//!
//! ## File Format
//! ```text
//! BEGIN|<tx>
//! CREATE|<tx>|<table>|<col1>,<col2>,...
//! INSERT|<tx>|<table>|<val1>,<val2>,...
//! COMMIT|<tx>
//! ```

mod record;
mod txn;
mod writer;

pub use record::{TxRecord, FIELD_DELIMITER};
pub use txn::{TxId, TxIdGenerator};
pub use writer::WalWriter;

/// File name of the log inside the data directory
pub const WAL_FILENAME: &str = "wal.log";
