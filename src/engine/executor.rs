//! Query executor

use serde::Serialize;

use crate::column::{Column, Value};
use crate::error::Result;
use crate::monitor::Store;
use crate::parser::{parse_query, ColumnSelection, Query};
use crate::table::Schema;

/// Result of a query: one row of values per table row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    pub table: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one column, by name
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.columns.iter().position(|c| c == name)?;
        Some(self.rows.iter().map(|row| &row[index]).collect())
    }
}

/// Parse and execute a query string
pub fn run_query(input: &str, schema: &Schema, store: &Store) -> Result<ResultSet> {
    let query = parse_query(input)?;
    execute_query(&query, schema, store)
}

/// Execute a parsed query against the current state
///
/// All column references are resolved before any row is evaluated, so an
/// unknown table or column fails the whole query. Once evaluation starts it
/// cannot fail: columns absorb per-row problems into empty values.
pub fn execute_query(query: &Query, schema: &Schema, store: &Store) -> Result<ResultSet> {
    let table = schema.table(&query.table)?;

    let columns: Vec<Column> = match &query.columns {
        ColumnSelection::All => table.columns().to_vec(),
        ColumnSelection::List(refs) => refs
            .iter()
            .map(|r| table.column(&r.to_string()))
            .collect::<Result<_>>()?,
    };

    let rows: Vec<Vec<Value>> = table
        .rows(store)
        .into_iter()
        .take(query.limit.unwrap_or(usize::MAX))
        .map(|row| columns.iter().map(|column| column.evaluate(row)).collect())
        .collect();

    tracing::debug!(
        table = table.name(),
        columns = columns.len(),
        rows = rows.len(),
        "query executed"
    );

    Ok(ResultSet {
        table: table.name().to_string(),
        columns: columns.iter().map(|c| c.name().to_string()).collect(),
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FixedBasepath;
    use crate::error::HostLensError;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    const STATE: &str = r#"{
        "hosts": [{"name": "server01", "state": 0}, {"name": "server02", "state": 1}],
        "services": [
            {"host_name": "server01", "description": "CPU load"},
            {"host_name": "server02", "description": "Memory", "state": 2}
        ]
    }"#;

    fn fixture() -> (TempDir, Schema, Store) {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("server01")).unwrap();
        fs::write(temp_dir.path().join("server01").join("notes.txt"), "ok").unwrap();

        let schema = Schema::with_basepath(
            Arc::new(FixedBasepath(temp_dir.path().to_path_buf())),
            1024,
        )
        .unwrap();
        (temp_dir, schema, Store::from_json(STATE).unwrap())
    }

    #[test]
    fn test_select_all_static_columns() {
        let (_dir, schema, store) = fixture();
        let result = run_query("SELECT * FROM hosts", &schema, &store).unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result.columns.len(), schema.table("hosts").unwrap().columns().len());
        assert!(!result.columns.iter().any(|c| c.starts_with("file")));
    }

    #[test]
    fn test_select_with_file_column() {
        let (_dir, schema, store) = fixture();
        let result = run_query("SELECT name, file:notes.txt FROM hosts", &schema, &store).unwrap();

        assert_eq!(result.columns, vec!["name", "file:notes.txt"]);
        assert_eq!(
            result.rows,
            vec![
                vec![Value::Text("server01".into()), Value::Text("ok".into())],
                vec![Value::Text("server02".into()), Value::Text(String::new())],
            ]
        );
    }

    #[test]
    fn test_bad_argument_does_not_abort_query() {
        let (_dir, schema, store) = fixture();
        let result = run_query(
            "SELECT host_name, host_file:../../etc/passwd, state FROM services",
            &schema,
            &store,
        )
        .unwrap();

        assert_eq!(result.len(), 2);
        let files = result.column("host_file:../../etc/passwd").unwrap();
        assert!(files.iter().all(|v| v.is_empty()));
        assert_eq!(result.column("state").unwrap(), vec![&Value::Int(0), &Value::Int(2)]);
    }

    #[test]
    fn test_limit() {
        let (_dir, schema, store) = fixture();
        let result = run_query("SELECT name FROM hosts LIMIT 1", &schema, &store).unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_unknown_references_fail() {
        let (_dir, schema, store) = fixture();
        assert!(matches!(
            run_query("SELECT name FROM downtimes", &schema, &store),
            Err(HostLensError::UnknownTable(_))
        ));
        assert!(matches!(
            run_query("SELECT bogus FROM hosts", &schema, &store),
            Err(HostLensError::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_empty_table() {
        let (_dir, schema, store) = fixture();
        let result = run_query("SELECT time, message FROM log", &schema, &store).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.columns, vec!["time", "message"]);
    }
}
