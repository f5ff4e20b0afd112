//! Error handling for trade record ingestion and export.
//!
//! The decoding, description parsing and enrichment core never fails; every
//! malformed field degrades to a default. These errors only cover the I/O
//! edges around it: reading delimited files, loading lookup tables and
//! writing cleaned output.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TradeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Input not found: {path}")]
    InputNotFound { path: PathBuf },

    #[error("Invalid input pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Failed to load HSN lookup table {path}: {reason}")]
    LookupTable { path: PathBuf, reason: String },

    #[error("Export failed for {path}: {reason}")]
    Export { path: PathBuf, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

pub type Result<T> = std::result::Result<T, TradeError>;
