//! Storage Module
//!
//! Fixed-size paged files, one per table.
//!
//! ## Responsibilities
//! - Block I/O by page index (`PageStore`)
//! - Data page layout: next-page link, used-byte counter, row heap (`Page`)
//! - Table header encoding in page 0 (`TableHeader`)
//! - Row payload encoding (`row`)
//!
//! ## File Format
//! ```text
//! <table>.tbl
//! ┌────────────────────────────────────────┐  offset 0
//! │ Page 0: Table Header                   │
//! │ ┌──────────┬──────────────────────────┐│
//! │ │NCols (2) │ (NameLen (2) + Name) *   ││
//! │ ├──────────┼──────────────────────────┤│
//! │ │NPages(2) │ PageIndex (8) *          ││
//! │ └──────────┴──────────────────────────┘│
//! ├────────────────────────────────────────┤  offset PAGE_SIZE
//! │ Page 1..N: Data Page                   │
//! │ ┌──────────┬──────────┬──────────────┐ │
//! │ │ Next (8) │ Used (2) │ Row Heap     │ │
//! │ └──────────┴──────────┴──────────────┘ │
//! │ Row Heap: (RowLen (2) + Payload) *     │
//! └────────────────────────────────────────┘
//! ```
//!
//! All integers are little-endian. There is no free list: page `i` always
//! lives at byte offset `i * PAGE_SIZE`.

mod page_store;
mod page;
mod header;
pub mod row;

pub use page_store::PageStore;
pub use page::{Page, RowIter};
pub use header::TableHeader;

/// Zero-based page index within a table file
pub type PageId = u64;

/// Size of every page on disk
pub const PAGE_SIZE: usize = 4096;

/// Index of the table header page
pub const HEADER_PAGE_ID: PageId = 0;

/// Next-page value marking the end of a chain
pub const NO_PAGE: PageId = 0;

/// Byte offset of the row heap within a data page
pub const DATA_OFFSET: usize = 10;

/// Bytes available for row records in one data page
pub const HEAP_CAPACITY: usize = PAGE_SIZE - DATA_OFFSET;

/// Size of the length prefix in front of each row record
pub const ROW_LEN_SIZE: usize = 2;
