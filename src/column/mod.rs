//! Columns and the values they produce
//!
//! A [`Column`] is a per-row accessor handed to the query executor. The set
//! of column kinds is closed: static attribute columns, and the file columns
//! created by [`crate::dynamic::DynamicHostFileColumn`]. Evaluation never
//! fails; when the data behind a column is absent the column yields the
//! empty value of its type.

pub mod attribute;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dynamic::HostFileColumn;
use crate::relation::RowRef;

pub use attribute::{Attribute, AttributeColumn};

/// A single cell of a result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Time(DateTime<Utc>),
    List(Vec<String>),
}

impl Value {
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Int(i) => *i == 0,
            Value::Float(f) => *f == 0.0,
            Value::Text(s) => s.is_empty(),
            Value::Time(_) => false,
            Value::List(items) => items.is_empty(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::Time(t) => write!(f, "{}", t.format("%Y-%m-%d %H:%M:%S")),
            Value::List(items) => write!(f, "{}", items.join(",")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Int,
    Float,
    String,
    Time,
    List,
}

impl ColumnType {
    /// Value reported when the data behind a column is unavailable
    pub fn empty_value(&self) -> Value {
        match self {
            ColumnType::Int => Value::Int(0),
            ColumnType::Float => Value::Float(0.0),
            ColumnType::String => Value::Text(String::new()),
            ColumnType::Time => Value::Null,
            ColumnType::List => Value::List(Vec::new()),
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Int => write!(f, "int"),
            ColumnType::Float => write!(f, "float"),
            ColumnType::String => write!(f, "string"),
            ColumnType::Time => write!(f, "time"),
            ColumnType::List => write!(f, "list"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Column {
    Attribute(AttributeColumn),
    HostFile(HostFileColumn),
}

impl Column {
    pub fn name(&self) -> &str {
        match self {
            Column::Attribute(c) => c.name(),
            Column::HostFile(c) => c.name(),
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Column::Attribute(c) => c.description(),
            Column::HostFile(c) => c.description(),
        }
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Column::Attribute(c) => c.column_type(),
            Column::HostFile(c) => c.column_type(),
        }
    }

    pub fn evaluate(&self, row: RowRef<'_>) -> Value {
        match self {
            Column::Attribute(c) => c.evaluate(row),
            Column::HostFile(c) => c.evaluate(row),
        }
    }

    pub fn string_value(&self, row: RowRef<'_>) -> String {
        match self.evaluate(row) {
            Value::Null => String::new(),
            Value::Text(s) => s,
            other => other.to_string(),
        }
    }

    pub fn int_value(&self, row: RowRef<'_>) -> i64 {
        match self.evaluate(row) {
            Value::Int(i) => i,
            Value::Float(f) => f as i64,
            Value::Time(t) => t.timestamp(),
            _ => 0,
        }
    }

    pub fn time_value(&self, row: RowRef<'_>) -> Option<DateTime<Utc>> {
        match self.evaluate(row) {
            Value::Time(t) => Some(t),
            _ => None,
        }
    }

    pub fn list_value(&self, row: RowRef<'_>) -> Vec<String> {
        match self.evaluate(row) {
            Value::List(items) => items,
            Value::Null => Vec::new(),
            other => vec![other.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::Store;
    use crate::relation::{OwnerChain, Row};

    #[test]
    fn test_empty_values() {
        assert_eq!(ColumnType::Int.empty_value(), Value::Int(0));
        assert_eq!(ColumnType::String.empty_value(), Value::Text(String::new()));
        assert_eq!(ColumnType::Time.empty_value(), Value::Null);
        assert!(ColumnType::List.empty_value().is_empty());
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Int(3).to_string(), "3");
        assert_eq!(
            Value::List(vec!["a".to_string(), "b".to_string()]).to_string(),
            "a,b"
        );
        let t = DateTime::<Utc>::from_timestamp(0, 0).unwrap();
        assert_eq!(Value::Time(t).to_string(), "1970-01-01 00:00:00");
    }

    #[test]
    fn test_value_json_is_untagged() {
        let json = serde_json::to_string(&vec![
            Value::Int(1),
            Value::Text("x".to_string()),
            Value::Null,
        ])
        .unwrap();
        assert_eq!(json, r#"[1,"x",null]"#);
    }

    #[test]
    fn test_typed_accessors() {
        let store = Store::from_json(
            r#"{"hosts": [{"name": "server01", "state": 2}],
                "services": [{"host_name": "server01", "description": "CPU"}]}"#,
        )
        .unwrap();
        let row = RowRef::new(&store, Row::Host(&store.hosts()[0]));

        let name = Column::Attribute(AttributeColumn::new(
            "name",
            "Host name",
            Attribute::HostName,
            OwnerChain::direct(),
        ));
        let state = Column::Attribute(AttributeColumn::new(
            "state",
            "Host state",
            Attribute::HostState,
            OwnerChain::direct(),
        ));
        let services = Column::Attribute(AttributeColumn::new(
            "services",
            "Services",
            Attribute::HostServices,
            OwnerChain::direct(),
        ));

        assert_eq!(name.string_value(row), "server01");
        assert_eq!(state.int_value(row), 2);
        assert_eq!(services.list_value(row), vec!["CPU".to_string()]);
        assert!(name.time_value(row).is_none());
    }
}
