//! Response rendering
//!
//! Every response ends with exactly one terminal line: an error, a
//! confirmation, or a row-count summary.

use std::io::Write;

use crate::error::{DbError, Result};
use crate::query::QueryResult;
use crate::storage::row::FIELD_SEPARATOR;

/// Prefix of every error line
pub const ERROR_PREFIX: &str = "ERR: ";

pub const TABLE_CREATED: &str = "Table created";
pub const ROW_INSERTED: &str = "Row inserted";

/// Render a result or error as response lines
pub fn render(result: &Result<QueryResult>) -> Vec<String> {
    match result {
        Ok(QueryResult::TableCreated) => vec![TABLE_CREATED.to_string()],
        Ok(QueryResult::RowInserted) => vec![ROW_INSERTED.to_string()],
        Ok(QueryResult::Rows(rows)) => {
            let separator = FIELD_SEPARATOR.to_string();
            let mut lines: Vec<String> = rows
                .iter()
                .map(|row| row.join(separator.as_str()))
                .collect();
            lines.push(row_summary(rows.len()));
            lines
        }
        Err(e) => vec![render_error(e)],
    }
}

pub fn render_error(error: &DbError) -> String {
    format!("{}{}", ERROR_PREFIX, error)
}

fn row_summary(count: usize) -> String {
    format!("({} rows)", count)
}

/// Whether `line` ends a response
///
/// Row lines are not escaped, so a selected row whose text matches one of
/// these lines is taken as the end of the response.
pub fn is_terminal_line(line: &str) -> bool {
    line.starts_with(ERROR_PREFIX)
        || line == TABLE_CREATED
        || line == ROW_INSERTED
        || parse_row_summary(line).is_some()
}

/// Row count from a `(<n> rows)` summary line
pub fn parse_row_summary(line: &str) -> Option<usize> {
    line.strip_prefix('(')?
        .strip_suffix(" rows)")?
        .parse()
        .ok()
}

/// Write response lines, newline-terminated, and flush
pub fn write_lines<W: Write>(writer: &mut W, lines: &[String]) -> Result<()> {
    for line in lines {
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
