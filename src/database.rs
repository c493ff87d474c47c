//! Database facade
//!
//! Wires the WAL and the table engine together. Every mutating request is
//! bracketed as BEGIN -> action record -> engine call -> COMMIT.

use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::engine::{validate_table_name, TableEngine};
use crate::error::Result;
use crate::query::{QueryResult, Request};
use crate::wal::{TxId, TxIdGenerator, WalWriter, WAL_FILENAME};

/// A data directory opened for serving requests
pub struct Database {
    config: Config,
    engine: TableEngine,
    wal: WalWriter,
    tx_ids: TxIdGenerator,
}

impl Database {
    /// Open or create a database with the given config
    ///
    /// On startup:
    /// 1. Create the data directory if needed
    /// 2. Open `wal.log` for appending
    /// 3. Start transaction IDs at 1
    pub fn open(config: Config) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)?;

        let wal = WalWriter::open(&config.data_dir.join(WAL_FILENAME))?;
        let engine = TableEngine::new(&config.data_dir, config.table_locking);

        tracing::info!("database opened at {}", config.data_dir.display());

        Ok(Self {
            config,
            engine,
            wal,
            tx_ids: TxIdGenerator::new(),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }

    /// Execute a request
    ///
    /// A failed engine call leaves its BEGIN record without a COMMIT. An
    /// invalid table name is rejected before anything is logged.
    pub fn execute(&self, request: Request) -> Result<QueryResult> {
        validate_table_name(request.table())?;

        match request {
            Request::CreateTable(create) => {
                let tx = self.begin()?;
                self.wal.log_create(tx, &create.table, &create.columns)?;
                self.engine.create_table(&create)?;
                self.wal.log_commit(tx)?;
                Ok(QueryResult::TableCreated)
            }
            Request::Insert(insert) => {
                let tx = self.begin()?;
                self.wal.log_insert(tx, &insert.table, &insert.values)?;
                self.engine.insert_row(&insert)?;
                self.wal.log_commit(tx)?;
                Ok(QueryResult::RowInserted)
            }
            Request::Select(select) => self.engine.select_rows(&select).map(QueryResult::Rows),
        }
    }

    fn begin(&self) -> Result<TxId> {
        let tx = self.tx_ids.next_id();
        self.wal.log_begin(tx)?;
        Ok(tx)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn engine(&self) -> &TableEngine {
        &self.engine
    }

    pub fn wal(&self) -> &WalWriter {
        &self.wal
    }

    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
