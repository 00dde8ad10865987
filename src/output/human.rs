//! Human-readable output formatting

use crate::column::Value;
use crate::engine::ResultSet;
use crate::table::Table;

pub fn format_human(result: &ResultSet) -> String {
    let cells: Vec<Vec<String>> = result
        .rows
        .iter()
        .map(|row| row.iter().map(display_cell).collect())
        .collect();

    let widths: Vec<usize> = result
        .columns
        .iter()
        .enumerate()
        .map(|(i, name)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain(std::iter::once(name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut output = String::new();
    output.push_str(&format_line(&result.columns, &widths));
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    output.push_str(&format_line(&rule, &widths));
    for row in &cells {
        output.push_str(&format_line(row, &widths));
    }

    let count = result.len();
    output.push_str(&format!(
        "({} {})",
        count,
        if count == 1 { "row" } else { "rows" }
    ));
    output
}

pub fn format_human_table_info(table: &Table) -> String {
    let mut output = format!("{} - {}\n", table.name(), table.description());
    output.push_str(&"-".repeat(output.chars().count() - 1));
    output.push('\n');

    output.push_str("\nColumns:\n");
    for column in table.columns() {
        output.push_str(&format!(
            "  {:<22} {:<7} {}\n",
            column.name(),
            column.column_type().to_string(),
            column.description()
        ));
    }

    if !table.dynamic_columns().is_empty() {
        output.push_str("\nDynamic columns (use NAME:ARGUMENTS):\n");
        for column in table.dynamic_columns() {
            output.push_str(&format!(
                "  {:<22} {:<7} {}\n",
                column.name(),
                column.column_type().to_string(),
                column.description()
            ));
        }
    }

    output
}

fn display_cell(value: &Value) -> String {
    value.to_string().replace('\n', "\\n")
}

fn format_line(cells: &[String], widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    format!("{}\n", padded.join("  ").trim_end())
}
