//! Textual query parser
//!
//! Recognizes three statement shapes:
//! ```text
//! SELECT c1, c2 FROM t [WHERE left op right];
//! CREATE TABLE t (c1, c2, ...);
//! INSERT INTO t VALUES (v1, v2, ...);
//! ```
//! Keywords are case-insensitive. Whitespace around list items is trimmed and
//! one pair of surrounding single quotes is removed from values.

use crate::error::{DbError, Result};

use super::{CreateTable, Insert, Operator, Predicate, Request, Select};

/// Parse a single statement
pub fn parse(statement: &str) -> Result<Request> {
    let statement = statement.trim();
    let statement = statement.strip_suffix(';').unwrap_or(statement).trim();

    if starts_with_keyword(statement, "SELECT") {
        parse_select(statement).map(Request::Select)
    } else if starts_with_keyword(statement, "CREATE TABLE") {
        parse_create_table(statement).map(Request::CreateTable)
    } else if starts_with_keyword(statement, "INSERT INTO") {
        parse_insert(statement).map(Request::Insert)
    } else if statement.is_empty() {
        Err(DbError::Parse("empty statement".to_string()))
    } else {
        Err(DbError::Parse(format!("unsupported statement: {}", statement)))
    }
}

fn starts_with_keyword(statement: &str, keyword: &str) -> bool {
    statement
        .get(..keyword.len())
        .map_or(false, |head| head.eq_ignore_ascii_case(keyword))
}

fn parse_select(statement: &str) -> Result<Select> {
    let tokens: Vec<&str> = statement.split_whitespace().collect();
    if tokens.len() < 4 {
        return Err(DbError::Parse("invalid SELECT syntax".to_string()));
    }

    let from = position_of(&tokens, "FROM")
        .filter(|&i| i > 1)
        .ok_or_else(|| DbError::Parse("missing FROM clause".to_string()))?;

    let columns = split_list(&tokens[1..from].join(" "));
    if columns.iter().any(String::is_empty) {
        return Err(DbError::Parse("empty column name in SELECT".to_string()));
    }

    let table = tokens
        .get(from + 1)
        .ok_or_else(|| DbError::Parse("missing table name".to_string()))?;

    let mut select = Select::new(*table, columns);

    if let Some(wh) = position_of(&tokens, "WHERE") {
        let clause = tokens
            .get(wh + 1..wh + 4)
            .ok_or_else(|| DbError::Parse("invalid WHERE clause".to_string()))?;
        select = select.with_predicate(Predicate::new(
            clause[0],
            Operator::parse(clause[1]),
            unquote(clause[2]),
        ));
    }

    Ok(select)
}

fn parse_create_table(statement: &str) -> Result<CreateTable> {
    let rest = statement["CREATE TABLE".len()..].trim();
    let (table, list) = split_parenthesized(rest)
        .ok_or_else(|| DbError::Parse("invalid CREATE TABLE syntax".to_string()))?;

    if table.is_empty() {
        return Err(DbError::Parse("missing table name".to_string()));
    }

    Ok(CreateTable::new(table, split_list(list)))
}

fn parse_insert(statement: &str) -> Result<Insert> {
    let rest = statement["INSERT INTO".len()..].trim();
    let values_at = find_keyword(rest, "VALUES")
        .ok_or_else(|| DbError::Parse("invalid INSERT syntax".to_string()))?;

    let table = rest[..values_at].trim();
    if table.is_empty() {
        return Err(DbError::Parse("missing table name".to_string()));
    }

    let list = rest[values_at + "VALUES".len()..].trim();
    let list = list.strip_prefix('(').unwrap_or(list);
    let list = list.strip_suffix(')').unwrap_or(list);

    let values = split_list(list).into_iter().map(|v| unquote(&v).to_string());
    Ok(Insert::new(table, values))
}

/// `name (a, b)` -> (`name`, `a, b`)
fn split_parenthesized(input: &str) -> Option<(&str, &str)> {
    let open = input.find('(')?;
    let close = input.find(')')?;
    if close < open {
        return None;
    }
    Some((input[..open].trim(), &input[open + 1..close]))
}

fn position_of(tokens: &[&str], keyword: &str) -> Option<usize> {
    tokens.iter().position(|t| t.eq_ignore_ascii_case(keyword))
}

/// Byte offset of the first case-insensitive occurrence of `keyword`
fn find_keyword(input: &str, keyword: &str) -> Option<usize> {
    input.to_ascii_uppercase().find(keyword)
}

fn split_list(list: &str) -> Vec<String> {
    list.split(',').map(|item| item.trim().to_string()).collect()
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('\'')
        .and_then(|v| v.strip_suffix('\''))
        .unwrap_or(value)
}
