//! Statement framing
//!
//! Lines are accumulated until one contains the terminator.

use std::io::BufRead;

use crate::error::{DbError, Result};

/// Character that ends a statement
pub const TERMINATOR: char = ';';

/// Maximum buffered statement size (1 MB)
pub const MAX_STATEMENT_SIZE: usize = 1024 * 1024;

/// Reads terminator-delimited statements from a line stream
pub struct StatementReader<R> {
    reader: R,
    buffer: String,
}

impl<R: BufRead> StatementReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: String::new(),
        }
    }

    /// Read the next complete statement
    ///
    /// Returns `Ok(None)` on a clean end of stream. A partial statement left
    /// at end of stream is discarded.
    pub fn next_statement(&mut self) -> Result<Option<String>> {
        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                if !self.buffer.trim().is_empty() {
                    tracing::debug!("discarding unterminated statement at EOF");
                }
                self.buffer.clear();
                return Ok(None);
            }

            self.buffer.push_str(&line);
            if self.buffer.len() > MAX_STATEMENT_SIZE {
                self.buffer.clear();
                return Err(DbError::Protocol(format!(
                    "statement exceeds {} bytes",
                    MAX_STATEMENT_SIZE
                )));
            }

            if self.buffer.contains(TERMINATOR) {
                let statement = self.buffer.trim().to_string();
                self.buffer.clear();
                return Ok(Some(statement));
            }
        }
    }

    /// Access the underlying reader
    pub fn get_ref(&self) -> &R {
        &self.reader
    }
}
