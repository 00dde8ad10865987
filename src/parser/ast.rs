//! Abstract Syntax Tree definitions for Hostlens queries

use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed `SELECT` query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub columns: ColumnSelection,
    pub table: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnSelection {
    /// `*`: every static column of the table
    All,
    List(Vec<ColumnRef>),
}

/// A column as written in the query, e.g. `file:notes.txt`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRef {
    pub name: String,
    /// Text after the first `:`, with surrounding quotes removed
    pub arguments: Option<String>,
}

impl ColumnRef {
    pub fn new(name: impl Into<String>, arguments: Option<&str>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.map(str::to_string),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.arguments {
            Some(arguments) => write!(f, "{}:{}", self.name, arguments),
            None => write!(f, "{}", self.name),
        }
    }
}
