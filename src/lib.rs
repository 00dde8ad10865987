//! Hostlens - a read-only live query engine over monitoring state
//!
//! Hostlens exposes hosts, services, log entries and comments as tables with
//! named columns. Besides static columns, tables carry *dynamic* columns
//! whose behavior is chosen by an argument in the column reference, such as
//! `file:notes.txt`, which reads `notes.txt` from each host's directory.
//!
//! # Example
//!
//! ```no_run
//! use hostlens::{run_query, format_output, ConfigHandle, OutputFormat, Schema, Store};
//!
//! let config = ConfigHandle::from_file("hostlens.toml").unwrap();
//! let schema = Schema::new(&config).unwrap();
//! let store = Store::load("state.json").unwrap();
//! let result = run_query("SELECT name, file:notes.txt FROM hosts", &schema, &store).unwrap();
//! println!("{}", format_output(&result, &OutputFormat::Human));
//! ```

pub mod cli;
pub mod column;
pub mod config;
pub mod dynamic;
pub mod engine;
pub mod error;
pub mod logging;
pub mod monitor;
pub mod output;
pub mod parser;
pub mod relation;
pub mod table;

pub use column::{Column, ColumnType, Value};
pub use config::{BasepathProvider, Config, ConfigHandle, FixedBasepath};
pub use dynamic::{DynamicColumn, DynamicHostFileColumn, FileAttribute, HostFileColumn};
pub use engine::{execute_query, run_query, ResultSet};
pub use error::{HostLensError, Result};
pub use monitor::Store;
pub use output::{format_output, format_table_info, OutputFormat};
pub use parser::{parse_query, Query};
pub use relation::{resolve, resolve_host, OwnerChain, Relation, Row, RowRef};
pub use table::{Schema, Table};
