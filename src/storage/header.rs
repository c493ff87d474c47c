//! Table header codec
//!
//! The header lives in page 0 and records the column names (in row field
//! order) and the data page indices in chain discovery order.

use bytes::{Buf, BufMut};

use crate::error::{DbError, Result};

use super::{Page, PageId, HEADER_PAGE_ID};

/// Decoded contents of a table's header page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableHeader {
    /// Column names, order defines row field order
    pub columns: Vec<String>,

    /// Data page indices, head to tail
    pub page_ids: Vec<PageId>,
}

impl TableHeader {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            page_ids: Vec::new(),
        }
    }

    /// Number of bytes `encode_into` writes
    pub fn encoded_len(&self) -> usize {
        let columns: usize = self.columns.iter().map(|c| 2 + c.len()).sum();
        2 + columns + 2 + 8 * self.page_ids.len()
    }

    /// Position of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Index of the last data page, if any
    pub fn last_page(&self) -> Option<PageId> {
        self.page_ids.last().copied()
    }

    /// Encode into `buf` from offset 0, zeroing everything after
    pub fn encode_into(&self, buf: &mut [u8]) -> Result<()> {
        let needed = self.encoded_len();
        if needed > buf.len() {
            return Err(DbError::HeaderOverflow {
                page_id: HEADER_PAGE_ID,
                needed,
                capacity: buf.len(),
            });
        }
        if self.columns.len() > u16::MAX as usize || self.page_ids.len() > u16::MAX as usize {
            return Err(DbError::Format("header list exceeds u16 count".to_string()));
        }
        if let Some(column) = self.columns.iter().find(|c| c.len() > u16::MAX as usize) {
            return Err(DbError::Format(format!("column name of {} bytes", column.len())));
        }

        buf.fill(0);
        let mut out = &mut buf[..];
        out.put_u16_le(self.columns.len() as u16);
        for column in &self.columns {
            out.put_u16_le(column.len() as u16);
            out.put_slice(column.as_bytes());
        }

        out.put_u16_le(self.page_ids.len() as u16);
        for id in &self.page_ids {
            out.put_u64_le(*id);
        }
        Ok(())
    }

    /// Encode into a fresh header page
    pub fn to_page(&self) -> Result<Page> {
        let mut page = Page::new(HEADER_PAGE_ID);
        self.encode_into(page.as_bytes_mut())?;
        Ok(page)
    }

    /// Decode a header from the start of `buf`
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let mut input = buf;

        let column_count = read_u16(&mut input, "column count")?;
        let mut columns = Vec::with_capacity(column_count as usize);
        for i in 0..column_count {
            let len = read_u16(&mut input, "column name length")? as usize;
            if input.remaining() < len {
                return Err(DbError::Format(format!(
                    "column {} name needs {} bytes, {} left",
                    i,
                    len,
                    input.remaining()
                )));
            }
            let name = String::from_utf8(input[..len].to_vec())
                .map_err(|e| DbError::Format(format!("column {} name: {}", i, e)))?;
            input.advance(len);
            columns.push(name);
        }

        let page_count = read_u16(&mut input, "page count")?;
        let mut page_ids = Vec::with_capacity(page_count as usize);
        for i in 0..page_count {
            if input.remaining() < 8 {
                return Err(DbError::Format(format!(
                    "page index {} needs 8 bytes, {} left",
                    i,
                    input.remaining()
                )));
            }
            page_ids.push(input.get_u64_le());
        }

        Ok(Self { columns, page_ids })
    }

    /// Decode the header stored in `page`
    pub fn from_page(page: &Page) -> Result<Self> {
        Self::decode(page.as_bytes())
    }
}

fn read_u16(input: &mut &[u8], what: &str) -> Result<u16> {
    if input.remaining() < 2 {
        return Err(DbError::Format(format!(
            "{} needs 2 bytes, {} left",
            what,
            input.remaining()
        )));
    }
    Ok(input.get_u16_le())
}
