//! # pagedb
//!
//! A minimal relational storage engine with:
//! - One fixed-size paged file per table
//! - A binary table header in page 0
//! - Row heaps chained across pages on overflow
//! - A write-ahead log (WAL) recording every mutating operation
//! - A line-oriented TCP front end
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │              (one worker thread per client)                  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  statement text
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                   Query Parser                               │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  Request
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Database                                 │
//! │        BEGIN → action → engine call → COMMIT                 │
//! └──────────┬──────────────────────────────┬───────────────────┘
//!            │                              │
//!            ▼                              ▼
//!   ┌─────────────────┐          ┌─────────────────────┐
//!   │       WAL       │          │    Table Engine     │
//!   │ (append + sync) │          │ header, page chain  │
//!   └─────────────────┘          └──────────┬──────────┘
//!                                           │
//!                                           ▼
//!                                ┌─────────────────────┐
//!                                │     Page Store      │
//!                                │  <table>.tbl files  │
//!                                └─────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod storage;
pub mod wal;
pub mod query;
pub mod engine;
pub mod database;
pub mod protocol;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{DbError, Result};
pub use config::{Config, TableLocking};
pub use engine::TableEngine;
pub use database::Database;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of pagedb
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
