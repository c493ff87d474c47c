//! Query Module
//!
//! Structured requests consumed by the table engine, and the textual parser
//! that produces them.
//!
//! ## Request Kinds
//! - `CreateTable`: table name + ordered column names
//! - `Insert`: table name + ordered values
//! - `Select`: table name + requested columns + optional predicate

mod request;
mod predicate;
pub mod parser;

pub use request::{CreateTable, Insert, QueryResult, Request, Select, WILDCARD};
pub use predicate::{Operator, Predicate};
pub use parser::parse;
