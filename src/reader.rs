//! Delimited file ingestion.
//!
//! Reads customs row files with polars, keeping every column as text so
//! that positional decoding sees fields exactly as written (leading zeros
//! in HS codes and IECs included), and expands input glob patterns.

use crate::config::TradeConfig;
use crate::constants::columns::ROW_WIDTH;
use crate::decoder::decode_row;
use crate::error::{Result, TradeError};
use crate::models::TradeRecord;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Read a delimited file into rows of exactly `width` text fields
///
/// Null and empty cells both come back as `""`. Short rows are padded and
/// longer rows are cut at `width`, so every row keeps its leading positions
/// whatever the shape of the rows around it. A file without data rows yields
/// an empty vector.
pub fn read_string_rows(
    path: &Path,
    delimiter: u8,
    skip_header: bool,
    width: usize,
) -> Result<Vec<Vec<String>>> {
    if !path.exists() {
        return Err(TradeError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let read = CsvReadOptions::default()
        .with_has_header(false)
        .with_skip_rows(usize::from(skip_header))
        .with_schema(Some(text_schema(width)))
        .with_parse_options(
            CsvParseOptions::default()
                .with_separator(delimiter)
                .with_truncate_ragged_lines(true),
        )
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish());

    let df = match read {
        Ok(df) => df,
        Err(PolarsError::NoData(_)) => {
            debug!("No data rows in {}", path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    frame_to_rows(&df)
}

/// All-text schema of `width` positional columns
fn text_schema(width: usize) -> SchemaRef {
    let fields = (0..width.max(1))
        .map(|index| Field::new(format!("column_{}", index + 1).into(), DataType::String));
    Arc::new(Schema::from_iter(fields))
}

fn frame_to_rows(df: &DataFrame) -> Result<Vec<Vec<String>>> {
    let columns = df
        .get_columns()
        .iter()
        .map(|column| column.as_materialized_series().str())
        .collect::<PolarsResult<Vec<_>>>()?;

    let rows = (0..df.height())
        .map(|row| {
            columns
                .iter()
                .map(|values| values.get(row).unwrap_or_default().to_string())
                .collect()
        })
        .collect();

    Ok(rows)
}

/// Read a customs file into text rows using the configured delimiter and header
pub fn read_rows(path: &Path, config: &TradeConfig) -> Result<Vec<Vec<String>>> {
    read_string_rows(path, config.delimiter, config.has_header, ROW_WIDTH)
}

/// Read and decode every row of a customs file
pub fn read_records(path: &Path, config: &TradeConfig) -> Result<Vec<TradeRecord>> {
    let rows = read_rows(path, config)?;
    let records: Vec<TradeRecord> = rows.iter().map(|row| decode_row(row)).collect();

    debug!("Decoded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Expand input paths and glob patterns into a sorted, de-duplicated file list
///
/// An argument naming an existing file is taken as is. Anything else is
/// treated as a glob pattern, which must match at least one file.
pub fn resolve_inputs<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        let direct = Path::new(pattern);
        if direct.is_file() {
            files.push(direct.to_path_buf());
            continue;
        }

        let entries = ::glob::glob(pattern).map_err(|e| TradeError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        let before = files.len();
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(e) => warn!("Skipping unreadable path while expanding '{}': {}", pattern, e),
            }
        }

        if files.len() == before {
            return Err(TradeError::InputNotFound {
                path: direct.to_path_buf(),
            });
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}
