//! Engine Module
//!
//! Table-level operations over paged table files.
//!
//! ## Responsibilities
//! - Create a table file with its header page
//! - Append rows to the tail of the page chain, growing it on overflow
//! - Scan the page chain, filter, and project rows
//!
//! The engine never touches the WAL; callers bracket mutating operations
//! with BEGIN/COMMIT records themselves (see `Database`).

use std::collections::{HashMap, HashSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::TableLocking;
use crate::error::{DbError, Result};
use crate::query::{CreateTable, Insert, Select, WILDCARD};
use crate::storage::row::{decode_row, encode_row};
use crate::storage::{
    Page, PageId, PageStore, TableHeader, HEADER_PAGE_ID, HEAP_CAPACITY, NO_PAGE, ROW_LEN_SIZE,
};

/// The table storage engine
///
/// ## Concurrency
/// - Page stores are opened per call; nothing is cached between calls, so
///   every reader sees prior writes immediately.
/// - With `TableLocking::PerTable` each operation holds a mutex keyed by the
///   table name for its whole duration.
/// - With `TableLocking::None` concurrent inserts into one table race on the
///   header and the tail page.
pub struct TableEngine {
    /// Directory holding `<table>.tbl` files
    data_dir: PathBuf,

    locking: TableLocking,

    /// Per-table mutexes, created on first use
    table_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl TableEngine {
    /// Extension of table files
    pub const TABLE_EXTENSION: &'static str = "tbl";

    pub fn new(data_dir: impl Into<PathBuf>, locking: TableLocking) -> Self {
        Self {
            data_dir: data_dir.into(),
            locking,
            table_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Path of the file backing `table`
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", table, Self::TABLE_EXTENSION))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    // =========================================================================
    // Create
    // =========================================================================

    /// Create a table file holding only its header page
    ///
    /// Fails with `AlreadyExists` if the table file exists and is non-empty.
    /// An existing empty file counts as absent.
    pub fn create_table(&self, request: &CreateTable) -> Result<()> {
        validate_table_name(&request.table)?;

        self.with_table_lock(&request.table, || {
            let mut store = PageStore::open(&self.table_path(&request.table))?;
            if !store.is_empty()? {
                return Err(DbError::AlreadyExists(request.table.clone()));
            }

            let header_id = store.allocate_page()?;
            debug_assert_eq!(header_id, HEADER_PAGE_ID);

            let header = TableHeader::new(request.columns.clone());
            store.write_page(&header.to_page()?)?;

            tracing::info!(
                "created table '{}' with columns {:?}",
                request.table,
                request.columns
            );
            Ok(())
        })
    }

    // =========================================================================
    // Insert
    // =========================================================================

    /// Append one row to the table
    ///
    /// The row goes into the last page of the header's list. If it does not
    /// fit, a new page is allocated, linked from the old tail, and appended
    /// to the header.
    pub fn insert_row(&self, request: &Insert) -> Result<()> {
        validate_table_name(&request.table)?;

        self.with_existing_table(&request.table, || {
            let mut store = self.open_table(&request.table)?;
            let mut header = read_header(&mut store)?;

            if request.values.len() != header.columns.len() {
                return Err(DbError::ColumnCountMismatch {
                    table: request.table.clone(),
                    expected: header.columns.len(),
                    actual: request.values.len(),
                });
            }

            let payload = encode_row(&request.values);
            if ROW_LEN_SIZE + payload.len() > HEAP_CAPACITY {
                return Err(DbError::RowTooLarge {
                    size: payload.len(),
                    capacity: HEAP_CAPACITY - ROW_LEN_SIZE,
                });
            }

            // First data page
            let tail_id = match header.last_page() {
                Some(id) => id,
                None => {
                    let id = store.allocate_page()?;
                    header.page_ids.push(id);
                    store.write_page(&header.to_page()?)?;
                    tracing::debug!("table '{}': first data page {}", request.table, id);
                    id
                }
            };

            let mut tail = read_data_page(&mut store, tail_id);
            if tail.insert_row(&payload) {
                store.write_page(&tail)?;
                return Ok(());
            }

            // Tail is full: chain a new page. The grown header is encoded
            // first so a full header page fails before anything is written.
            let new_id = store.allocate_page()?;
            let mut fresh = Page::new(new_id);
            if !fresh.insert_row(&payload) {
                return Err(DbError::RowTooLarge {
                    size: payload.len(),
                    capacity: HEAP_CAPACITY - ROW_LEN_SIZE,
                });
            }
            header.page_ids.push(new_id);
            let header_page = header.to_page()?;
            tail.set_next_page(new_id);

            store.write_page(&fresh)?;
            store.write_page(&tail)?;
            store.write_page(&header_page)?;

            tracing::debug!(
                "table '{}': page {} full, chained page {}",
                request.table,
                tail_id,
                new_id
            );
            Ok(())
        })
    }

    // =========================================================================
    // Select
    // =========================================================================

    /// Scan the table and return projected rows in insertion order
    ///
    /// Fails with `ColumnNotFound` if a requested column is not in the header.
    /// A predicate naming an unknown column, or using an unsupported
    /// operator, matches no rows.
    pub fn select_rows(&self, request: &Select) -> Result<Vec<Vec<String>>> {
        validate_table_name(&request.table)?;

        self.with_existing_table(&request.table, || {
            let mut store = self.open_table(&request.table)?;
            let header = read_header(&mut store)?;

            let projection = resolve_columns(&request.table, &header, &request.columns)?;

            let filter = request
                .predicate
                .as_ref()
                .map(|p| (p, header.column_index(&p.column)));

            let mut rows = Vec::new();
            for page in scan_pages(&mut store, &header)? {
                for record in page.rows() {
                    let fields = decode_row(record);

                    if let Some((predicate, column)) = &filter {
                        let keep = column
                            .and_then(|i| fields.get(i))
                            .map_or(false, |value| predicate.matches(value));
                        if !keep {
                            continue;
                        }
                    }

                    rows.push(
                        projection
                            .iter()
                            .map(|&i| fields.get(i).cloned().unwrap_or_default())
                            .collect(),
                    );
                }
            }

            tracing::debug!("table '{}': selected {} rows", request.table, rows.len());
            Ok(rows)
        })
    }

    /// Read and decode a table's header page
    pub fn read_header(&self, table: &str) -> Result<TableHeader> {
        validate_table_name(table)?;
        self.with_existing_table(table, || {
            let mut store = self.open_table(table)?;
            read_header(&mut store)
        })
    }

    /// Whether a non-empty file exists for `table`
    pub fn table_exists(&self, table: &str) -> bool {
        std::fs::metadata(self.table_path(table))
            .map(|m| m.len() > 0)
            .unwrap_or(false)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Open an existing, non-empty table file
    fn open_table(&self, table: &str) -> Result<PageStore> {
        let store = match PageStore::open_existing(&self.table_path(table)) {
            Ok(store) => store,
            Err(DbError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                return Err(DbError::TableNotFound(table.to_string()));
            }
            Err(e) => return Err(e),
        };

        if store.is_empty()? {
            return Err(DbError::TableNotFound(table.to_string()));
        }
        Ok(store)
    }

    /// Like `with_table_lock`, but fails with `TableNotFound` before a lock
    /// is created for a table that does not exist. Tables are never dropped,
    /// so the lock map only grows with created tables.
    fn with_existing_table<T>(&self, table: &str, op: impl FnOnce() -> Result<T>) -> Result<T> {
        if !self.table_exists(table) {
            return Err(DbError::TableNotFound(table.to_string()));
        }
        self.with_table_lock(table, op)
    }

    fn with_table_lock<T>(&self, table: &str, op: impl FnOnce() -> Result<T>) -> Result<T> {
        match self.locking {
            TableLocking::None => op(),
            TableLocking::PerTable => {
                let lock = Arc::clone(
                    self.table_locks
                        .lock()
                        .entry(table.to_string())
                        .or_default(),
                );
                let _guard = lock.lock();
                op()
            }
        }
    }
}

fn read_header(store: &mut PageStore) -> Result<TableHeader> {
    let page = store.read_page(HEADER_PAGE_ID)?;
    TableHeader::from_page(&page)
}

/// Read a data page; a failed read yields an uninitialized page
fn read_data_page(store: &mut PageStore, id: PageId) -> Page {
    match store.read_page(id) {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!(
                "page {} of {} unreadable ({}), treating as empty",
                id,
                store.path().display(),
                e
            );
            Page::new(id)
        }
    }
}

/// Collect data pages in scan order
///
/// Walks the chain from each listed page in list order, following next
/// pointers. Each page is visited once, at its first discovery.
fn scan_pages(store: &mut PageStore, header: &TableHeader) -> Result<Vec<Page>> {
    let mut visited = HashSet::new();
    let mut pages = Vec::new();

    for &head in &header.page_ids {
        let mut current = head;
        while current != NO_PAGE && visited.insert(current) {
            let page = store.read_page(current)?;
            current = page.next_page();
            pages.push(page);
        }
    }
    Ok(pages)
}

/// Map requested column names to header positions
fn resolve_columns(table: &str, header: &TableHeader, requested: &[String]) -> Result<Vec<usize>> {
    let mut projection = Vec::new();
    for name in requested {
        if name == WILDCARD {
            projection.extend(0..header.columns.len());
            continue;
        }
        let index = header
            .column_index(name)
            .ok_or_else(|| DbError::ColumnNotFound {
                table: table.to_string(),
                column: name.clone(),
            })?;
        projection.push(index);
    }
    Ok(projection)
}

/// Table names become file names and WAL fields
pub(crate) fn validate_table_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(DbError::InvalidName(name.to_string()))
    }
}
