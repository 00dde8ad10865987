//! Output formatting

use crate::engine::ResultSet;
use crate::output::human::{format_human, format_human_table_info};
use crate::output::json::{format_json, format_json_table_info};
use crate::table::Table;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

pub fn format_output(result: &ResultSet, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_human(result),
        OutputFormat::Json => format_json(result),
    }
}

/// Describe the static and dynamic columns of a table
pub fn format_table_info(table: &Table, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_human_table_info(table),
        OutputFormat::Json => format_json_table_info(table),
    }
}
