//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hostlens")]
#[command(author, version, about = "Query live monitoring state with SQL-like commands", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: SubCommand,

    /// Configuration file (TOML)
    #[arg(long, short, global = true, env = "HOSTLENS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Monitoring state snapshot (JSON)
    #[arg(long, short, global = true, env = "HOSTLENS_STATE")]
    pub state: Option<PathBuf>,

    /// Root directory for per-host files (overrides the configuration)
    #[arg(long, global = true, env = "HOSTLENS_HOSTFILES_BASEPATH")]
    pub basepath: Option<PathBuf>,

    /// Largest host file read, in bytes (overrides the configuration)
    #[arg(long, global = true, env = "HOSTLENS_MAX_FILE_SIZE")]
    pub max_file_size: Option<u64>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum SubCommand {
    /// Execute a single query
    Query {
        /// The query to execute, e.g. "SELECT name, file:notes.txt FROM hosts"
        query: String,
    },

    /// List all tables
    Tables,

    /// Describe the columns of a table
    Columns {
        /// Table name
        table: String,
    },

    /// Show the effective configuration
    Config,
}
