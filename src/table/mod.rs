//! Table and schema registry
//!
//! The [`Schema`] is built once and shared read-only by all queries. Each
//! [`Table`] holds its static columns and the dynamic columns that are
//! instantiated per query from a `<name>:<arguments>` reference.

use std::sync::Arc;

use crate::column::{Attribute, AttributeColumn, Column};
use crate::config::{BasepathProvider, ConfigHandle};
use crate::dynamic::{DynamicColumn, DynamicHostFileColumn, FileAttribute};
use crate::error::{HostLensError, Result};
use crate::monitor::Store;
use crate::relation::{OwnerChain, Relation, Row, RowRef};

/// Separator between a dynamic column name and its arguments
pub const ARGUMENT_SEPARATOR: char = ':';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Hosts,
    Services,
    Log,
    Comments,
}

impl TableKind {
    pub fn name(&self) -> &'static str {
        match self {
            TableKind::Hosts => "hosts",
            TableKind::Services => "services",
            TableKind::Log => "log",
            TableKind::Comments => "comments",
        }
    }

    pub fn rows<'a>(&self, store: &'a Store) -> Vec<RowRef<'a>> {
        match self {
            TableKind::Hosts => store
                .hosts()
                .iter()
                .map(|h| RowRef::new(store, Row::Host(h)))
                .collect(),
            TableKind::Services => store
                .services()
                .iter()
                .map(|s| RowRef::new(store, Row::Service(s)))
                .collect(),
            TableKind::Log => store
                .log_entries()
                .iter()
                .map(|e| RowRef::new(store, Row::LogEntry(e)))
                .collect(),
            TableKind::Comments => store
                .comments()
                .iter()
                .map(|c| RowRef::new(store, Row::Comment(c)))
                .collect(),
        }
    }
}

/// Split a column reference into its name and optional arguments
pub fn split_reference(reference: &str) -> (&str, Option<&str>) {
    match reference.split_once(ARGUMENT_SEPARATOR) {
        Some((name, arguments)) => (name, Some(arguments)),
        None => (reference, None),
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    kind: TableKind,
    description: String,
    columns: Vec<Column>,
    dynamic_columns: Vec<DynamicColumn>,
}

impl Table {
    fn new(kind: TableKind, description: &str) -> Self {
        Self {
            kind,
            description: description.to_string(),
            columns: Vec::new(),
            dynamic_columns: Vec::new(),
        }
    }

    fn attribute(mut self, name: &str, description: &str, attribute: Attribute, chain: &OwnerChain) -> Self {
        self.columns.push(Column::Attribute(AttributeColumn::new(
            name,
            description,
            attribute,
            chain.clone(),
        )));
        self
    }

    fn dynamic(mut self, column: impl Into<DynamicColumn>) -> Self {
        self.dynamic_columns.push(column.into());
        self
    }

    /// Register the four host file columns, all sharing one provider
    fn host_files(
        mut self,
        prefix: &str,
        chain: &OwnerChain,
        basepath: &Arc<dyn BasepathProvider>,
        max_file_size: u64,
    ) -> Self {
        let kinds = [
            ("file", "Content of a file below the host directory", FileAttribute::Content),
            ("file_exists", "Whether a file below the host directory exists", FileAttribute::Exists),
            ("file_size", "Size of a file below the host directory", FileAttribute::Size),
            ("file_mtime", "Modification time of a file below the host directory", FileAttribute::Mtime),
        ];
        for (suffix, description, attribute) in kinds {
            self = self.dynamic(DynamicHostFileColumn::new(
                format!("{}{}", prefix, suffix),
                description,
                chain.clone(),
                Arc::clone(basepath),
                attribute,
                max_file_size,
            ));
        }
        self
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn kind(&self) -> TableKind {
        self.kind
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn dynamic_columns(&self) -> &[DynamicColumn] {
        &self.dynamic_columns
    }

    /// Look up a column by reference
    ///
    /// `name` finds a static column, or a dynamic column created with empty
    /// arguments. `name:arguments` always goes to a dynamic column.
    pub fn column(&self, reference: &str) -> Result<Column> {
        let (name, arguments) = split_reference(reference);

        if arguments.is_none() {
            if let Some(column) = self.columns.iter().find(|c| c.name() == name) {
                return Ok(column.clone());
            }
        }

        match self.dynamic_columns.iter().find(|c| c.name() == name) {
            Some(dynamic) => Ok(dynamic.create_column(reference, arguments.unwrap_or(""))),
            None => Err(HostLensError::UnknownColumn {
                table: self.name().to_string(),
                column: reference.to_string(),
            }),
        }
    }

    pub fn rows<'a>(&self, store: &'a Store) -> Vec<RowRef<'a>> {
        self.kind.rows(store)
    }
}

#[derive(Debug, Clone)]
pub struct Schema {
    tables: Vec<Table>,
}

impl Schema {
    /// Build the schema with host files located through `config`
    pub fn new(config: &ConfigHandle) -> Result<Self> {
        let max_file_size = config.get().hostfiles.max_file_size;
        Self::with_basepath(Arc::new(config.clone()), max_file_size)
    }

    pub fn with_basepath(basepath: Arc<dyn BasepathProvider>, max_file_size: u64) -> Result<Self> {
        let direct = OwnerChain::direct();
        let host = OwnerChain::host();
        let service = OwnerChain::new(&[Relation::Service])?;

        let hosts = Table::new(TableKind::Hosts, "Monitored hosts")
            .attribute("name", "Host name", Attribute::HostName, &direct)
            .attribute("alias", "Host alias", Attribute::HostAlias, &direct)
            .attribute("address", "IP address", Attribute::HostAddress, &direct)
            .attribute("state", "Current state (0: up, 1: down, 2: unreachable)", Attribute::HostState, &direct)
            .attribute("plugin_output", "Output of the last host check", Attribute::HostPluginOutput, &direct)
            .attribute("services", "Descriptions of the host's services", Attribute::HostServices, &direct)
            .attribute("num_services", "Number of services", Attribute::HostNumServices, &direct)
            .host_files("", &direct, &basepath, max_file_size);

        let services = Table::new(TableKind::Services, "Monitored services")
            .attribute("description", "Service description", Attribute::ServiceDescription, &direct)
            .attribute("state", "Current state (0: ok, 1: warn, 2: crit, 3: unknown)", Attribute::ServiceState, &direct)
            .attribute("plugin_output", "Output of the last service check", Attribute::ServicePluginOutput, &direct)
            .attribute("host_name", "Host name", Attribute::HostName, &host)
            .attribute("host_address", "IP address of the host", Attribute::HostAddress, &host)
            .attribute("host_state", "State of the host", Attribute::HostState, &host)
            .host_files("host_", &host, &basepath, max_file_size);

        let log = Table::new(TableKind::Log, "Monitoring log")
            .attribute("time", "Time of the entry", Attribute::LogTime, &direct)
            .attribute("type", "Entry type", Attribute::LogType, &direct)
            .attribute("message", "Log message", Attribute::LogMessage, &direct)
            .attribute("host_name", "Host name, if any", Attribute::HostName, &host)
            .attribute("service_description", "Service description, if any", Attribute::ServiceDescription, &service)
            .host_files("host_", &host, &basepath, max_file_size);

        let comments = Table::new(TableKind::Comments, "Host and service comments")
            .attribute("id", "Comment id", Attribute::CommentId, &direct)
            .attribute("author", "Author", Attribute::CommentAuthor, &direct)
            .attribute("comment", "Comment text", Attribute::CommentText, &direct)
            .attribute("entry_time", "Time the comment was entered", Attribute::CommentEntryTime, &direct)
            .attribute("host_name", "Host name, if any", Attribute::HostName, &host)
            .attribute("service_description", "Service description, if any", Attribute::ServiceDescription, &service)
            .host_files("host_", &host, &basepath, max_file_size);

        Ok(Self {
            tables: vec![hosts, services, log, comments],
        })
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Result<&Table> {
        self.tables
            .iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| HostLensError::UnknownTable(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Value;
    use crate::config::FixedBasepath;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn schema(basepath: &Path) -> Schema {
        Schema::with_basepath(Arc::new(FixedBasepath(basepath.to_path_buf())), 1024).unwrap()
    }

    #[test]
    fn test_split_reference() {
        assert_eq!(split_reference("name"), ("name", None));
        assert_eq!(split_reference("file:notes.txt"), ("file", Some("notes.txt")));
        assert_eq!(split_reference("file:a:b"), ("file", Some("a:b")));
        assert_eq!(split_reference("file:"), ("file", Some("")));
    }

    #[test]
    fn test_table_lookup() {
        let schema = schema(Path::new("/nonexistent"));
        assert_eq!(schema.tables().len(), 4);
        assert_eq!(schema.table("HOSTS").unwrap().kind(), TableKind::Hosts);
        assert!(matches!(
            schema.table("downtimes"),
            Err(HostLensError::UnknownTable(_))
        ));
    }

    #[test]
    fn test_static_and_dynamic_columns() {
        let schema = schema(Path::new("/nonexistent"));
        let hosts = schema.table("hosts").unwrap();

        assert!(matches!(hosts.column("name").unwrap(), Column::Attribute(_)));

        let file = hosts.column("file:notes.txt").unwrap();
        assert!(matches!(file, Column::HostFile(_)));
        assert_eq!(file.name(), "file:notes.txt");

        // Dynamic column without arguments still yields a column
        assert!(matches!(hosts.column("file").unwrap(), Column::HostFile(_)));
    }

    #[test]
    fn test_unknown_columns() {
        let schema = schema(Path::new("/nonexistent"));
        let hosts = schema.table("hosts").unwrap();

        assert!(matches!(
            hosts.column("nope"),
            Err(HostLensError::UnknownColumn { .. })
        ));
        // Static columns take no arguments
        assert!(hosts.column("name:x").is_err());
        // Prefixed file columns live on the related tables only
        assert!(hosts.column("host_file:x").is_err());
    }

    #[test]
    fn test_file_column_on_every_table() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("server01")).unwrap();
        fs::write(temp_dir.path().join("server01").join("notes.txt"), "ok").unwrap();

        let store = Store::from_json(
            r#"{
                "hosts": [{"name": "server01"}],
                "services": [{"host_name": "server01", "description": "CPU"}],
                "log": [{"time": 0, "host_name": "server01"}, {"time": 0}],
                "comments": [{"id": 1, "entry_time": 0, "host_name": "server01"}]
            }"#,
        )
        .unwrap();
        let schema = schema(temp_dir.path());

        let cases = [
            ("hosts", "file:notes.txt", vec!["ok"]),
            ("services", "host_file:notes.txt", vec!["ok"]),
            ("log", "host_file:notes.txt", vec!["ok", ""]),
            ("comments", "host_file:notes.txt", vec!["ok"]),
        ];

        for (table_name, reference, expected) in cases {
            let table = schema.table(table_name).unwrap();
            let column = table.column(reference).unwrap();
            let values: Vec<Value> = table
                .rows(&store)
                .into_iter()
                .map(|row| column.evaluate(row))
                .collect();
            let expected: Vec<Value> = expected
                .into_iter()
                .map(|s| Value::Text(s.to_string()))
                .collect();
            assert_eq!(values, expected, "table {}", table_name);
        }
    }

    #[test]
    fn test_schema_follows_config_reload() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir(temp_dir.path().join("server01")).unwrap();
        fs::write(temp_dir.path().join("server01").join("notes.txt"), "ok").unwrap();

        let store = Store::from_json(r#"{"hosts": [{"name": "server01"}]}"#).unwrap();
        let handle = ConfigHandle::default();
        let schema = Schema::new(&handle).unwrap();
        let hosts = schema.table("hosts").unwrap();
        let row = hosts.rows(&store)[0];

        let column = hosts.column("file:notes.txt").unwrap();
        assert_eq!(column.string_value(row), "");

        let mut config = (*handle.get()).clone();
        config.hostfiles.basepath = temp_dir.path().to_path_buf();
        handle.update(config).unwrap();

        assert_eq!(column.string_value(row), "ok");
        assert_eq!(hosts.column("file:notes.txt").unwrap().string_value(row), "ok");
    }
}
