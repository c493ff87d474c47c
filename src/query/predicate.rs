//! Single-column predicates
//!
//! Comparisons are on raw string values; `<` and `>` are lexicographic.

use std::fmt;

/// Comparison operator in a WHERE clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    Eq,
    NotEq,
    Lt,
    Gt,
    /// Anything else the parser saw. Never matches a row.
    Unsupported(String),
}

impl Operator {
    pub fn parse(token: &str) -> Self {
        match token {
            "=" => Operator::Eq,
            "!=" => Operator::NotEq,
            "<" => Operator::Lt,
            ">" => Operator::Gt,
            other => Operator::Unsupported(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Unsupported(op) => op,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `column <op> literal`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Predicate {
    pub column: String,
    pub operator: Operator,
    pub literal: String,
}

impl Predicate {
    pub fn new(column: impl Into<String>, operator: Operator, literal: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            operator,
            literal: literal.into(),
        }
    }

    /// Evaluate against a field value
    pub fn matches(&self, value: &str) -> bool {
        let literal = self.literal.as_str();
        match self.operator {
            Operator::Eq => value == literal,
            Operator::NotEq => value != literal,
            Operator::Lt => value < literal,
            Operator::Gt => value > literal,
            Operator::Unsupported(_) => false,
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.operator, self.literal)
    }
}
