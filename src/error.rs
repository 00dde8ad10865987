//! Error types for Hostlens

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostLensError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Unknown column '{column}' in table '{table}'")]
    UnknownColumn { table: String, column: String },

    #[error("Invalid owner chain: {0}")]
    InvalidChain(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("State error: {0}")]
    State(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HostLensError>;
