//! Data page layout
//!
//! ```text
//! ┌──────────────┬────────────┬─────────────────────────────────────────┐
//! │ next (u64le) │ used (u16) │ [len (u16le) | payload] ...   free ...  │
//! └──────────────┴────────────┴─────────────────────────────────────────┘
//!  0             8            10                                 PAGE_SIZE
//! ```
//!
//! `used` counts bytes from `DATA_OFFSET`, so `DATA_OFFSET + used` is the
//! next free byte in the heap. A zeroed page is a valid empty data page with
//! no successor.

use bytes::{Buf, BufMut};

use crate::error::{DbError, Result};

use super::{PageId, DATA_OFFSET, HEAP_CAPACITY, PAGE_SIZE, ROW_LEN_SIZE};

const NEXT_RANGE: std::ops::Range<usize> = 0..8;
const USED_RANGE: std::ops::Range<usize> = 8..10;

/// A single fixed-size page and its index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    id: PageId,
    data: Vec<u8>,
}

impl Page {
    /// Create a zeroed page
    pub fn new(id: PageId) -> Self {
        Self {
            id,
            data: vec![0u8; PAGE_SIZE],
        }
    }

    /// Wrap raw page bytes, which must be exactly `PAGE_SIZE` long
    pub fn from_bytes(id: PageId, data: Vec<u8>) -> Result<Self> {
        if data.len() != PAGE_SIZE {
            return Err(DbError::Format(format!(
                "page {} is {} bytes, expected {}",
                id,
                data.len(),
                PAGE_SIZE
            )));
        }
        Ok(Self { id, data })
    }

    pub fn id(&self) -> PageId {
        self.id
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// True if the page was never initialized on disk
    pub fn is_zeroed(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    // =========================================================================
    // Header fields
    // =========================================================================

    /// Index of the next page in the chain, `NO_PAGE` at the tail
    pub fn next_page(&self) -> PageId {
        (&self.data[NEXT_RANGE]).get_u64_le()
    }

    pub fn set_next_page(&mut self, next: PageId) {
        let mut slot = &mut self.data[NEXT_RANGE];
        slot.put_u64_le(next);
    }

    /// Bytes of the heap in use
    pub fn used(&self) -> usize {
        (&self.data[USED_RANGE]).get_u16_le() as usize
    }

    fn set_used(&mut self, used: usize) {
        let mut slot = &mut self.data[USED_RANGE];
        slot.put_u16_le(used as u16);
    }

    /// Bytes still available for row records
    pub fn free_space(&self) -> usize {
        HEAP_CAPACITY.saturating_sub(self.used())
    }

    // =========================================================================
    // Row heap
    // =========================================================================

    /// Append a length-prefixed row record to the heap
    ///
    /// Returns `false` without touching the page if the record does not fit.
    pub fn insert_row(&mut self, row: &[u8]) -> bool {
        let used = self.used();
        let required = ROW_LEN_SIZE + row.len();
        if used + required > HEAP_CAPACITY {
            return false;
        }

        let start = DATA_OFFSET + used;
        let mut slot = &mut self.data[start..start + required];
        slot.put_u16_le(row.len() as u16);
        slot.put_slice(row);

        self.set_used(used + required);
        true
    }

    /// Iterate row payloads in heap order
    ///
    /// Stops early at a record whose prefix or payload would run past `used`
    /// or the end of the page.
    pub fn rows(&self) -> RowIter<'_> {
        let end = DATA_OFFSET + self.used().min(HEAP_CAPACITY);
        RowIter {
            heap: &self.data[DATA_OFFSET..end],
        }
    }

    /// Collect all row payloads in heap order
    pub fn read_rows(&self) -> Vec<Vec<u8>> {
        self.rows().map(<[u8]>::to_vec).collect()
    }
}

/// Iterator over the row records of a data page
pub struct RowIter<'a> {
    heap: &'a [u8],
}

impl<'a> Iterator for RowIter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        if self.heap.len() < ROW_LEN_SIZE {
            return None;
        }

        let len = (&self.heap[..ROW_LEN_SIZE]).get_u16_le() as usize;
        let end = ROW_LEN_SIZE + len;
        if end > self.heap.len() {
            tracing::warn!(
                "truncated row record: {} bytes declared, {} left",
                len,
                self.heap.len() - ROW_LEN_SIZE
            );
            self.heap = &[];
            return None;
        }

        let payload = &self.heap[ROW_LEN_SIZE..end];
        self.heap = &self.heap[end..];
        Some(payload)
    }
}
