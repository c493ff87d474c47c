//! WAL Writer
//!
//! Appends records to the log file, one synced write per record.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::Result;

use super::{TxId, TxRecord};

/// Append-only durability log shared by every writer in the process
///
/// The file handle sits behind a mutex, so records from concurrent callers
/// never interleave. Every append is followed by `sync_data` before it
/// returns.
pub struct WalWriter {
    path: PathBuf,
    file: Mutex<File>,
}

impl WalWriter {
    /// Open or create a WAL file in append mode
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        tracing::debug!("WAL opened at {}", path.display());

        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    /// Append one record and force it to disk
    pub fn append(&self, record: &TxRecord) -> Result<()> {
        let line = record.to_line();

        let mut file = self.file.lock();
        file.write_all(line.as_bytes())?;
        file.sync_data()?;
        drop(file);

        tracing::trace!("WAL append: {}", record);
        Ok(())
    }

    pub fn log_begin(&self, tx: TxId) -> Result<()> {
        self.append(&TxRecord::Begin { tx })
    }

    pub fn log_create(&self, tx: TxId, table: &str, columns: &[String]) -> Result<()> {
        self.append(&TxRecord::Create {
            tx,
            table: table.to_string(),
            columns: columns.to_vec(),
        })
    }

    pub fn log_insert(&self, tx: TxId, table: &str, values: &[String]) -> Result<()> {
        self.append(&TxRecord::Insert {
            tx,
            table: table.to_string(),
            values: values.to_vec(),
        })
    }

    pub fn log_commit(&self, tx: TxId) -> Result<()> {
        self.append(&TxRecord::Commit { tx })
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }
}
