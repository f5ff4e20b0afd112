//! Configuration management and validation.
//!
//! Provides the settings for reading delimited customs files, choosing the
//! HS code lookup table and writing the cleaned output.

use crate::constants::DEFAULT_DELIMITER;
use crate::error::{Result, TradeError};
use crate::hsn::HsnTable;
use polars::prelude::ParquetCompression;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Output file formats for cleaned records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    /// Apache Parquet
    Parquet,
    /// Delimited text using the configured delimiter
    Csv,
}

impl ExportFormat {
    /// Detect export format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_string_lossy().to_lowercase();

        match extension.as_str() {
            "parquet" | "pq" => Some(ExportFormat::Parquet),
            "csv" | "tsv" | "txt" => Some(ExportFormat::Csv),
            _ => None,
        }
    }

    /// File extension written for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Parquet => "parquet",
            ExportFormat::Csv => "csv",
        }
    }
}

/// Supported compression algorithms for parquet files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompressionAlgorithm {
    /// Snappy compression - good balance of speed and compression
    Snappy,
    /// ZSTD compression - better compression ratio, slower
    Zstd,
    /// LZ4 compression - fastest, lower compression ratio
    Lz4,
    /// No compression
    Uncompressed,
}

impl CompressionAlgorithm {
    /// Convert to polars ParquetCompression type
    pub fn to_polars_compression(&self) -> ParquetCompression {
        match self {
            CompressionAlgorithm::Snappy => ParquetCompression::Snappy,
            CompressionAlgorithm::Zstd => ParquetCompression::Zstd(None),
            CompressionAlgorithm::Lz4 => ParquetCompression::Lz4Raw,
            CompressionAlgorithm::Uncompressed => ParquetCompression::Uncompressed,
        }
    }

    /// Parse a compression name as accepted on the command line
    pub fn parse(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "snappy" => Ok(CompressionAlgorithm::Snappy),
            "zstd" => Ok(CompressionAlgorithm::Zstd),
            "lz4" => Ok(CompressionAlgorithm::Lz4),
            "none" | "uncompressed" => Ok(CompressionAlgorithm::Uncompressed),
            other => Err(TradeError::Configuration {
                message: format!(
                    "Unknown compression '{}' (expected snappy, zstd, lz4 or none)",
                    other
                ),
            }),
        }
    }
}

/// Global configuration for trade record processing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeConfig {
    /// Field delimiter of input rows
    pub delimiter: u8,

    /// Whether the first row of each input file is a header
    pub has_header: bool,

    /// Optional HS code lookup CSV replacing the builtin table
    pub lookup_table: Option<PathBuf>,

    /// Field delimiter of the lookup CSV, independent of the input delimiter
    pub lookup_delimiter: u8,

    /// Format used when the output extension is not recognised
    pub export_format: ExportFormat,

    /// Parquet compression
    pub compression: CompressionAlgorithm,
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            has_header: true,
            lookup_table: None,
            lookup_delimiter: DEFAULT_DELIMITER,
            export_format: ExportFormat::Parquet,
            compression: CompressionAlgorithm::Snappy,
        }
    }
}

impl TradeConfig {
    /// Use a custom field delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Treat the first row as data rather than a header
    pub fn without_header(mut self) -> Self {
        self.has_header = false;
        self
    }

    /// Load HS codes from a lookup CSV instead of the builtin table
    pub fn with_lookup_table(mut self, path: impl Into<PathBuf>) -> Self {
        self.lookup_table = Some(path.into());
        self
    }

    /// Use a custom delimiter for the lookup CSV
    pub fn with_lookup_delimiter(mut self, delimiter: u8) -> Self {
        self.lookup_delimiter = delimiter;
        self
    }

    /// Set the fallback export format
    pub fn with_export_format(mut self, format: ExportFormat) -> Self {
        self.export_format = format;
        self
    }

    /// Set parquet compression
    pub fn with_compression(mut self, compression: CompressionAlgorithm) -> Self {
        self.compression = compression;
        self
    }

    /// Check the settings are usable for reading and writing
    pub fn validate(&self) -> Result<()> {
        check_delimiter("Delimiter", self.delimiter)?;
        check_delimiter("Lookup delimiter", self.lookup_delimiter)?;

        if let Some(path) = &self.lookup_table {
            if !path.exists() {
                return Err(TradeError::InputNotFound { path: path.clone() });
            }
        }

        Ok(())
    }

    /// Resolve the export format for an output path
    pub fn export_format_for(&self, path: &Path) -> ExportFormat {
        ExportFormat::from_path(path).unwrap_or(self.export_format)
    }

    /// Build the HS code lookup table these settings select
    pub fn load_hsn_table(&self) -> Result<HsnTable> {
        match &self.lookup_table {
            Some(path) => {
                debug!("Loading HSN lookup table from {}", path.display());
                HsnTable::load_csv(path, self.lookup_delimiter)
            }
            None => Ok(HsnTable::builtin().clone()),
        }
    }
}

fn check_delimiter(label: &str, delimiter: u8) -> Result<()> {
    if !delimiter.is_ascii() {
        return Err(TradeError::Configuration {
            message: format!("{} must be a single ASCII byte, got {:#04x}", label, delimiter),
        });
    }

    if matches!(delimiter, b'\n' | b'\r' | b'"') {
        return Err(TradeError::Configuration {
            message: format!(
                "{} {:?} conflicts with row or quote handling",
                label, delimiter as char
            ),
        });
    }

    Ok(())
}
