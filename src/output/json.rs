//! JSON output formatting

use std::collections::HashSet;

use serde_json::{json, Map, Value};

use crate::engine::ResultSet;
use crate::table::Table;

/// Rows as objects keyed by column name
///
/// A column selected more than once gets a numbered key (`name (2)`), and
/// `columns` lists the same keys, so no cell is lost.
pub fn format_json(result: &ResultSet) -> String {
    let keys = unique_keys(&result.columns);
    let rows: Vec<Value> = result
        .rows
        .iter()
        .map(|row| {
            let object: Map<String, Value> = keys
                .iter()
                .zip(row)
                .map(|(name, value)| {
                    (name.clone(), serde_json::to_value(value).unwrap_or(Value::Null))
                })
                .collect();
            Value::Object(object)
        })
        .collect();

    let data = json!({
        "table": result.table,
        "columns": keys,
        "rows": rows,
    });

    serde_json::to_string_pretty(&data).unwrap_or_else(|_| "{}".to_string())
}

fn unique_keys(columns: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    columns
        .iter()
        .map(|name| {
            let mut key = name.clone();
            let mut n = 1;
            while !seen.insert(key.clone()) {
                n += 1;
                key = format!("{} ({})", name, n);
            }
            key
        })
        .collect()
}

pub fn format_json_table_info(table: &Table) -> String {
    let columns: Vec<Value> = table
        .columns()
        .iter()
        .map(|c| json!({ "name": c.name(), "type": c.column_type(), "description": c.description() }))
        .collect();
    let dynamic: Vec<Value> = table
        .dynamic_columns()
        .iter()
        .map(|c| json!({ "name": c.name(), "type": c.column_type(), "description": c.description() }))
        .collect();

    let data = json!({
        "table": table.name(),
        "description": table.description(),
        "columns": columns,
        "dynamic_columns": dynamic,
    });

    serde_json::to_string_pretty(&data).unwrap_or_else(|_| "{}".to_string())
}
