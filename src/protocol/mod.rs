//! Protocol Module
//!
//! Line-oriented text protocol between clients and the server.
//!
//! ## Request Format
//! ```text
//! SELECT id, name
//!   FROM users WHERE id = 2;      <- statement ends at the line holding ';'
//! ```
//!
//! ## Response Format
//! ```text
//! 2,bob                           <- one line per selected row
//! (1 rows)                        <- summary ends a select response
//!
//! Table created | Row inserted    <- mutation confirmations
//! ERR: <message>                  <- any failure
//! ```

mod framing;
mod response;

pub use framing::{StatementReader, MAX_STATEMENT_SIZE, TERMINATOR};
pub use response::{
    is_terminal_line, parse_row_summary, render, render_error, write_lines, ERROR_PREFIX,
    ROW_INSERTED, TABLE_CREATED,
};
