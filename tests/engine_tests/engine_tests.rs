//! Tests for TableEngine
//!
//! These tests verify:
//! - Table creation and duplicate detection
//! - Row insertion and first-page bootstrap
//! - Page chain growth on overflow
//! - Scan order, projection, and predicate filtering
//! - Error cases (missing table/column, oversized rows)
//! - Header page capacity limits
//! - Unlocked and per-table locked modes

use std::sync::Arc;
use std::thread;

use pagedb::engine::TableEngine;
use pagedb::query::{CreateTable, Insert, Operator, Predicate, Select};
use pagedb::storage::{PageStore, TableHeader, HEAP_CAPACITY, NO_PAGE, PAGE_SIZE};
use pagedb::{DbError, TableLocking};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_engine() -> (TempDir, TableEngine) {
    let temp_dir = TempDir::new().unwrap();
    let engine = TableEngine::new(temp_dir.path(), TableLocking::PerTable);
    (temp_dir, engine)
}

fn setup_users(engine: &TableEngine) {
    engine
        .create_table(&CreateTable::new("users", ["id", "name"]))
        .unwrap();
    engine.insert_row(&Insert::new("users", ["1", "alice"])).unwrap();
    engine.insert_row(&Insert::new("users", ["2", "bob"])).unwrap();
}

fn rows(expected: &[&[&str]]) -> Vec<Vec<String>> {
    expected
        .iter()
        .map(|row| row.iter().map(|f| f.to_string()).collect())
        .collect()
}

/// Single-column value whose record takes exactly 100 bytes
fn hundred_byte_value(i: usize) -> String {
    format!("{:0>98}", i)
}

// =============================================================================
// Create Tests
// =============================================================================

#[test]
fn test_create_table_writes_header_page() {
    let (_temp, engine) = setup_temp_engine();

    engine
        .create_table(&CreateTable::new("users", ["id", "name"]))
        .unwrap();

    let path = engine.table_path("users");
    assert!(path.ends_with("users.tbl"));
    assert_eq!(std::fs::metadata(&path).unwrap().len(), PAGE_SIZE as u64);
    assert!(engine.table_exists("users"));

    let header = engine.read_header("users").unwrap();
    assert_eq!(header.columns, vec!["id", "name"]);
    assert!(header.page_ids.is_empty());
}

#[test]
fn test_create_duplicate_table_fails() {
    let (_temp, engine) = setup_temp_engine();
    setup_users(&engine);
    let before = std::fs::read(engine.table_path("users")).unwrap();

    let result = engine.create_table(&CreateTable::new("users", ["other"]));

    assert!(matches!(result, Err(DbError::AlreadyExists(ref t)) if t == "users"));
    assert_eq!(std::fs::read(engine.table_path("users")).unwrap(), before);
    assert_eq!(
        engine.select_rows(&Select::all("users")).unwrap(),
        rows(&[&["1", "alice"], &["2", "bob"]])
    );
}

#[test]
fn test_create_over_empty_file_succeeds() {
    let (_temp, engine) = setup_temp_engine();
    std::fs::write(engine.table_path("ghost"), b"").unwrap();

    engine.create_table(&CreateTable::new("ghost", ["a"])).unwrap();

    assert_eq!(engine.read_header("ghost").unwrap().columns, vec!["a"]);
}

#[test]
fn test_create_rejects_path_like_names() {
    let (_temp, engine) = setup_temp_engine();

    for name in ["", "../escape", "a/b", "pipe|name", "with space"] {
        let result = engine.create_table(&CreateTable::new(name, ["a"]));
        assert!(matches!(result, Err(DbError::InvalidName(_))), "name {:?}", name);
    }
}

// =============================================================================
// Insert Tests
// =============================================================================

#[test]
fn test_first_insert_bootstraps_data_page() {
    let (_temp, engine) = setup_temp_engine();
    engine.create_table(&CreateTable::new("t", ["v"])).unwrap();

    engine.insert_row(&Insert::new("t", ["hello"])).unwrap();

    let header = engine.read_header("t").unwrap();
    assert_eq!(header.page_ids, vec![1]);

    let mut store = PageStore::open(&engine.table_path("t")).unwrap();
    let page = store.read_page(1).unwrap();
    assert_eq!(page.next_page(), NO_PAGE);
    assert_eq!(page.read_rows(), vec![b"hello".to_vec()]);
}

#[test]
fn test_insert_into_missing_table() {
    let (_temp, engine) = setup_temp_engine();

    let result = engine.insert_row(&Insert::new("nope", ["1"]));

    assert!(matches!(result, Err(DbError::TableNotFound(ref t)) if t == "nope"));
    assert!(!engine.table_path("nope").exists());
}

#[test]
fn test_insert_wrong_value_count() {
    let (_temp, engine) = setup_temp_engine();
    setup_users(&engine);

    let result = engine.insert_row(&Insert::new("users", ["3"]));

    assert!(matches!(
        result,
        Err(DbError::ColumnCountMismatch { expected: 2, actual: 1, .. })
    ));
}

#[test]
fn test_chain_growth_on_overflow() {
    let (_temp, engine) = setup_temp_engine();
    engine.create_table(&CreateTable::new("big", ["v"])).unwrap();

    let per_page = HEAP_CAPACITY / 100;
    for i in 0..per_page {
        engine.insert_row(&Insert::new("big", [hundred_byte_value(i)])).unwrap();
    }
    assert_eq!(engine.read_header("big").unwrap().page_ids, vec![1]);

    // One more row does not fit page A
    engine
        .insert_row(&Insert::new("big", [hundred_byte_value(per_page)]))
        .unwrap();

    let header = engine.read_header("big").unwrap();
    assert_eq!(header.page_ids, vec![1, 2]);

    let mut store = PageStore::open(&engine.table_path("big")).unwrap();
    let page_a = store.read_page(1).unwrap();
    let page_b = store.read_page(2).unwrap();
    assert_eq!(page_a.next_page(), 2);
    assert_eq!(page_a.read_rows().len(), per_page);
    assert_eq!(page_b.next_page(), NO_PAGE);
    assert_eq!(page_b.read_rows().len(), 1);
    assert_eq!(store.len().unwrap(), 3 * PAGE_SIZE as u64);
}

#[test]
fn test_scan_across_chain_keeps_insertion_order_without_duplicates() {
    let (_temp, engine) = setup_temp_engine();
    engine.create_table(&CreateTable::new("big", ["v"])).unwrap();

    let total = (HEAP_CAPACITY / 100) * 3 + 5;
    for i in 0..total {
        engine.insert_row(&Insert::new("big", [hundred_byte_value(i)])).unwrap();
    }

    let header = engine.read_header("big").unwrap();
    assert_eq!(header.page_ids, vec![1, 2, 3, 4]);

    let selected = engine.select_rows(&Select::all("big")).unwrap();
    let expected: Vec<Vec<String>> = (0..total).map(|i| vec![hundred_byte_value(i)]).collect();
    assert_eq!(selected, expected);
}

#[test]
fn test_row_too_large() {
    let (_temp, engine) = setup_temp_engine();
    engine.create_table(&CreateTable::new("t", ["v"])).unwrap();

    let huge = "x".repeat(HEAP_CAPACITY);
    let result = engine.insert_row(&Insert::new("t", [huge]));

    assert!(matches!(result, Err(DbError::RowTooLarge { .. })));
    // nothing was allocated
    assert!(engine.read_header("t").unwrap().page_ids.is_empty());
    assert_eq!(
        std::fs::metadata(engine.table_path("t")).unwrap().len(),
        PAGE_SIZE as u64
    );
}

#[test]
fn test_full_header_rejects_insert_without_writing() {
    let (_temp, engine) = setup_temp_engine();
    engine.create_table(&CreateTable::new("big", ["v"])).unwrap();

    // Every row takes a whole page; header page 0 holds 511 page indices
    let row = |i: usize| format!("{:0>width$}", i, width = HEAP_CAPACITY - 2);
    let max_pages = (PAGE_SIZE - TableHeader::new(vec!["v".into()]).encoded_len()) / 8;
    for i in 0..max_pages {
        engine.insert_row(&Insert::new("big", [row(i)])).unwrap();
    }
    let path = engine.table_path("big");
    let before = std::fs::read(&path).unwrap();

    for attempt in 0..2 {
        let result = engine.insert_row(&Insert::new("big", [row(max_pages + attempt)]));
        assert!(matches!(result, Err(DbError::HeaderOverflow { .. })), "{:?}", result);
    }

    assert_eq!(std::fs::read(&path).unwrap(), before);
    assert_eq!(engine.read_header("big").unwrap().page_ids.len(), max_pages);
    let selected = engine.select_rows(&Select::all("big")).unwrap();
    assert_eq!(selected.len(), max_pages);
    assert_eq!(selected.last(), Some(&vec![row(max_pages - 1)]));
}

#[test]
fn test_largest_row_fills_one_page() {
    let (_temp, engine) = setup_temp_engine();
    engine.create_table(&CreateTable::new("t", ["v"])).unwrap();

    let largest = "x".repeat(HEAP_CAPACITY - 2);
    engine.insert_row(&Insert::new("t", [largest.clone()])).unwrap();
    engine.insert_row(&Insert::new("t", ["tiny"])).unwrap();

    assert_eq!(engine.read_header("t").unwrap().page_ids, vec![1, 2]);
    assert_eq!(
        engine.select_rows(&Select::all("t")).unwrap(),
        vec![vec![largest], vec!["tiny".to_string()]]
    );
}

// =============================================================================
// Select Tests
// =============================================================================

#[test]
fn test_select_all_in_insertion_order() {
    let (_temp, engine) = setup_temp_engine();
    setup_users(&engine);

    let result = engine.select_rows(&Select::all("users")).unwrap();

    assert_eq!(result, rows(&[&["1", "alice"], &["2", "bob"]]));
}

#[test]
fn test_select_with_equality_predicate() {
    let (_temp, engine) = setup_temp_engine();
    setup_users(&engine);

    let select = Select::new("users", ["name"])
        .with_predicate(Predicate::new("id", Operator::Eq, "2"));

    assert_eq!(engine.select_rows(&select).unwrap(), rows(&[&["bob"]]));
}

#[test]
fn test_select_projection_order_follows_request() {
    let (_temp, engine) = setup_temp_engine();
    setup_users(&engine);

    let result = engine
        .select_rows(&Select::new("users", ["name", "id", "name"]))
        .unwrap();

    assert_eq!(
        result,
        rows(&[&["alice", "1", "alice"], &["bob", "2", "bob"]])
    );
}

#[test]
fn test_select_comparison_operators() {
    let (_temp, engine) = setup_temp_engine();
    setup_users(&engine);
    engine.insert_row(&Insert::new("users", ["3", "carol"])).unwrap();

    let names = |op: Operator, literal: &str| {
        engine
            .select_rows(
                &Select::new("users", ["name"]).with_predicate(Predicate::new("id", op, literal)),
            )
            .unwrap()
    };

    assert_eq!(names(Operator::NotEq, "2"), rows(&[&["alice"], &["carol"]]));
    assert_eq!(names(Operator::Lt, "2"), rows(&[&["alice"]]));
    assert_eq!(names(Operator::Gt, "1"), rows(&[&["bob"], &["carol"]]));
}

#[test]
fn test_select_comparison_is_lexicographic() {
    let (_temp, engine) = setup_temp_engine();
    engine.create_table(&CreateTable::new("n", ["v"])).unwrap();
    for v in ["9", "10", "100"] {
        engine.insert_row(&Insert::new("n", [v])).unwrap();
    }

    let select = Select::all("n").with_predicate(Predicate::new("v", Operator::Gt, "2"));

    // "10" and "100" sort before "2"
    assert_eq!(engine.select_rows(&select).unwrap(), rows(&[&["9"]]));
}

#[test]
fn test_select_missing_column_fails() {
    let (_temp, engine) = setup_temp_engine();
    setup_users(&engine);

    let result = engine.select_rows(&Select::new("users", ["id", "email"]));

    assert!(matches!(
        result,
        Err(DbError::ColumnNotFound { ref column, .. }) if column == "email"
    ));
}

#[test]
fn test_predicate_on_unknown_column_excludes_rows() {
    let (_temp, engine) = setup_temp_engine();
    setup_users(&engine);

    let select = Select::all("users").with_predicate(Predicate::new("age", Operator::Eq, "1"));

    assert!(engine.select_rows(&select).unwrap().is_empty());
}

#[test]
fn test_unsupported_operator_excludes_rows() {
    let (_temp, engine) = setup_temp_engine();
    setup_users(&engine);

    let select = Select::all("users").with_predicate(Predicate::new(
        "id",
        Operator::parse("LIKE"),
        "1",
    ));

    assert!(engine.select_rows(&select).unwrap().is_empty());
}

#[test]
fn test_select_empty_table() {
    let (_temp, engine) = setup_temp_engine();
    engine.create_table(&CreateTable::new("empty", ["a"])).unwrap();

    assert!(engine.select_rows(&Select::all("empty")).unwrap().is_empty());
}

#[test]
fn test_select_missing_table() {
    let (_temp, engine) = setup_temp_engine();

    let result = engine.select_rows(&Select::all("nope"));

    assert!(matches!(result, Err(DbError::TableNotFound(_))));
}

#[test]
fn test_select_corrupt_header_is_format_error() {
    let (_temp, engine) = setup_temp_engine();
    // column count 5, then nothing usable
    let mut bytes = vec![0u8; 4];
    bytes[0] = 5;
    bytes[2] = 0xFF;
    bytes[3] = 0xFF;
    std::fs::write(engine.table_path("bad"), bytes).unwrap();

    let result = engine.select_rows(&Select::all("bad"));

    assert!(matches!(result, Err(DbError::Format(_))));
}

#[test]
fn test_values_with_separator_split_on_read() {
    let (_temp, engine) = setup_temp_engine();
    engine.create_table(&CreateTable::new("t", ["a", "b"])).unwrap();

    engine.insert_row(&Insert::new("t", ["x,y", "z"])).unwrap();

    assert_eq!(
        engine.select_rows(&Select::all("t")).unwrap(),
        rows(&[&["x", "y"]])
    );
}

// =============================================================================
// Persistence / Concurrency Tests
// =============================================================================

#[test]
fn test_data_survives_new_engine_instance() {
    let temp_dir = TempDir::new().unwrap();
    {
        let engine = TableEngine::new(temp_dir.path(), TableLocking::PerTable);
        setup_users(&engine);
    }

    let engine = TableEngine::new(temp_dir.path(), TableLocking::None);
    assert_eq!(
        engine.select_rows(&Select::all("users")).unwrap(),
        rows(&[&["1", "alice"], &["2", "bob"]])
    );
}

#[test]
fn test_operations_without_table_locking() {
    let temp_dir = TempDir::new().unwrap();
    let engine = TableEngine::new(temp_dir.path(), TableLocking::None);

    engine
        .create_table(&CreateTable::new("plain", ["id", "name"]))
        .unwrap();
    // 20-byte records
    let total = (HEAP_CAPACITY / 20) + 10;
    for i in 0..total {
        engine
            .insert_row(&Insert::new("plain", [format!("{:04}", i), format!("{:013}", i)]))
            .unwrap();
    }

    assert_eq!(engine.read_header("plain").unwrap().page_ids, vec![1, 2]);
    let selected = engine
        .select_rows(&Select::new("plain", ["id"]).with_predicate(Predicate::new(
            "id",
            Operator::Lt,
            "0003",
        )))
        .unwrap();
    assert_eq!(selected, rows(&[&["0000"], &["0001"], &["0002"]]));
    assert_eq!(
        engine.select_rows(&Select::all("plain")).unwrap().len(),
        total
    );
    assert!(matches!(
        engine.create_table(&CreateTable::new("plain", ["x"])),
        Err(DbError::AlreadyExists(_))
    ));
}

#[test]
fn test_concurrent_inserts_with_table_locking() {
    let (_temp, engine) = setup_temp_engine();
    engine.create_table(&CreateTable::new("c", ["writer", "seq"])).unwrap();
    let engine = Arc::new(engine);

    let writers = 4;
    let per_writer = 60;
    let handles: Vec<_> = (0..writers)
        .map(|w| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for i in 0..per_writer {
                    let values = [w.to_string(), format!("{:060}", i)];
                    engine.insert_row(&Insert::new("c", values)).unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let all = engine.select_rows(&Select::all("c")).unwrap();
    assert_eq!(all.len(), writers * per_writer);

    // each writer's rows appear in its own insertion order
    for w in 0..writers {
        let seqs: Vec<&String> = all
            .iter()
            .filter(|row| row[0] == w.to_string())
            .map(|row| &row[1])
            .collect();
        let expected: Vec<String> = (0..per_writer).map(|i| format!("{:060}", i)).collect();
        assert_eq!(seqs, expected.iter().collect::<Vec<_>>());
    }
}
