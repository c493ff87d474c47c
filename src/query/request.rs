//! Request and result definitions
//!
//! One struct per request kind; the `Request` enum only discriminates.

use super::Predicate;

/// Create a table with the given ordered column names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTable {
    pub table: String,
    pub columns: Vec<String>,
}

impl CreateTable {
    pub fn new<I, S>(table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

/// Insert one row, values in column order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insert {
    pub table: String,
    pub values: Vec<String>,
}

impl Insert {
    pub fn new<I, S>(table: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table: table.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Project columns from a table, optionally filtered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Select {
    pub table: String,

    /// Requested column names; `*` expands to all columns in declared order
    pub columns: Vec<String>,

    pub predicate: Option<Predicate>,
}

impl Select {
    pub fn new<I, S>(table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            predicate: None,
        }
    }

    /// Select every column
    pub fn all(table: impl Into<String>) -> Self {
        Self::new(table, [WILDCARD])
    }

    pub fn with_predicate(mut self, predicate: Predicate) -> Self {
        self.predicate = Some(predicate);
        self
    }
}

/// Column name that selects every column
pub const WILDCARD: &str = "*";

/// A parsed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    CreateTable(CreateTable),
    Insert(Insert),
    Select(Select),
}

impl Request {
    /// Whether the request mutates storage (and is therefore logged)
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Request::Select(_))
    }

    /// Target table name
    pub fn table(&self) -> &str {
        match self {
            Request::CreateTable(req) => &req.table,
            Request::Insert(req) => &req.table,
            Request::Select(req) => &req.table,
        }
    }
}

impl From<CreateTable> for Request {
    fn from(req: CreateTable) -> Self {
        Request::CreateTable(req)
    }
}

impl From<Insert> for Request {
    fn from(req: Insert) -> Self {
        Request::Insert(req)
    }
}

impl From<Select> for Request {
    fn from(req: Select) -> Self {
        Request::Select(req)
    }
}

/// Outcome of a successfully executed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    TableCreated,
    RowInserted,
    Rows(Vec<Vec<String>>),
}
