//! Dynamic columns
//!
//! A dynamic column is a schema entry whose concrete [`Column`] is built when
//! a query references it as `<name>:<arguments>`. The argument grammar is
//! owned by each kind.

pub mod host_file;

use crate::column::{Column, ColumnType};

pub use host_file::{DynamicHostFileColumn, FileAttribute, HostFileColumn};

#[derive(Debug, Clone)]
pub enum DynamicColumn {
    HostFile(DynamicHostFileColumn),
}

impl DynamicColumn {
    pub fn name(&self) -> &str {
        match self {
            DynamicColumn::HostFile(c) => c.name(),
        }
    }

    pub fn description(&self) -> &str {
        match self {
            DynamicColumn::HostFile(c) => c.description(),
        }
    }

    /// Type of the columns this factory creates
    pub fn column_type(&self) -> ColumnType {
        match self {
            DynamicColumn::HostFile(c) => c.column_type(),
        }
    }

    /// Create a fresh column; no caching takes place
    pub fn create_column(&self, name: &str, arguments: &str) -> Column {
        match self {
            DynamicColumn::HostFile(c) => Column::HostFile(c.create_column(name, arguments)),
        }
    }
}

impl From<DynamicHostFileColumn> for DynamicColumn {
    fn from(column: DynamicHostFileColumn) -> Self {
        DynamicColumn::HostFile(column)
    }
}
