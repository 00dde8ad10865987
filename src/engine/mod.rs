//! Execution engine for Hostlens queries

pub mod executor;

pub use executor::{execute_query, run_query, ResultSet};
