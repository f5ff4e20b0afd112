//! Cleaned-data export.
//!
//! Converts enriched trade records, their summaries and the HS code lookup
//! table into polars DataFrames and writes them as Parquet or delimited
//! text.

use crate::config::{ExportFormat, TradeConfig};
use crate::constants::CLEANED_HEADERS;
use crate::error::{Result, TradeError};
use crate::hsn::HsnTable;
use crate::models::TradeRecord;
use crate::summary::{HsnSummary, ModelSummary, SupplierSummary, TradeSummary, YearSummary};
use polars::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

fn text_column<F>(name: &str, records: &[TradeRecord], field: F) -> Column
where
    F: Fn(&TradeRecord) -> &str,
{
    let values: Vec<&str> = records.iter().map(field).collect();
    Column::new(name.into(), values)
}

fn amount_column<F>(name: &str, records: &[TradeRecord], field: F) -> Column
where
    F: Fn(&TradeRecord) -> f64,
{
    let values: Vec<f64> = records.iter().map(field).collect();
    Column::new(name.into(), values)
}

fn optional_text_column<F>(name: &str, records: &[TradeRecord], field: F) -> Column
where
    F: Fn(&TradeRecord) -> Option<&str>,
{
    let values: Vec<Option<&str>> = records.iter().map(field).collect();
    Column::new(name.into(), values)
}

/// Build the cleaned-data frame, one row per record
///
/// Derived fields of records that were never enriched are written as nulls,
/// except the grand total which is always computed.
pub fn records_to_dataframe(records: &[TradeRecord]) -> Result<DataFrame> {
    let h = CLEANED_HEADERS;

    let columns = vec![
        text_column(h[0], records, |r| r.date.as_str()),
        text_column(h[1], records, |r| r.port_code.as_str()),
        text_column(h[2], records, |r| r.iec.as_str()),
        text_column(h[3], records, |r| r.hs_code.as_str()),
        optional_text_column(h[4], records, |r| r.hsn_description.as_deref()),
        text_column(h[5], records, |r| r.goods_description.as_str()),
        optional_text_column(h[6], records, |r| r.main_category.as_deref()),
        optional_text_column(h[7], records, |r| r.sub_category.map(|c| c.label())),
        text_column(h[8], records, |r| r.model_name.as_str()),
        text_column(h[9], records, |r| r.model_number.as_str()),
        text_column(h[10], records, |r| r.capacity.as_str()),
        Column::new(
            h[11].into(),
            records.iter().map(|r| r.quantity).collect::<Vec<u64>>(),
        ),
        text_column(h[12], records, |r| r.unit.as_str()),
        amount_column(h[13], records, |r| r.unit_price_inr),
        amount_column(h[14], records, |r| r.total_value_inr),
        amount_column(h[15], records, |r| r.unit_price_usd),
        amount_column(h[16], records, |r| r.total_value_usd),
        amount_column(h[17], records, |r| r.duty_paid_inr),
        amount_column(h[18], records, |r| r.grand_total()),
        Column::new(
            h[19].into(),
            records.iter().map(|r| r.year).collect::<Vec<Option<i32>>>(),
        ),
    ];

    Ok(DataFrame::new(columns)?)
}

/// Write records to `path`, choosing the format from its extension
///
/// Parent directories are created as needed. Returns the number of rows
/// written.
pub fn write_records(records: &[TradeRecord], path: &Path, config: &TradeConfig) -> Result<usize> {
    let mut df = records_to_dataframe(records)?;
    let rows = write_frame(&mut df, path, config.export_format_for(path), config)?;

    info!("Wrote {} cleaned records to {}", rows, path.display());
    Ok(rows)
}

/// Build the per-year frame
pub fn year_summary_dataframe(years: &[YearSummary]) -> Result<DataFrame> {
    let columns = vec![
        Column::new("Year".into(), years.iter().map(|y| y.year).collect::<Vec<i32>>()),
        Column::new(
            "Total Value INR".into(),
            years.iter().map(|y| y.total_value_inr).collect::<Vec<f64>>(),
        ),
        Column::new(
            "Duty Paid INR".into(),
            years.iter().map(|y| y.duty_paid_inr).collect::<Vec<f64>>(),
        ),
        Column::new(
            "Grand Total INR".into(),
            years.iter().map(|y| y.grand_total_inr).collect::<Vec<f64>>(),
        ),
        Column::new(
            "YoY Growth".into(),
            years.iter().map(|y| y.yoy_growth).collect::<Vec<Option<f64>>>(),
        ),
    ];

    Ok(DataFrame::new(columns)?)
}

/// Build the per-HS-code frame
pub fn hsn_summary_dataframe(codes: &[HsnSummary]) -> Result<DataFrame> {
    let columns = vec![
        Column::new(
            "HS Code".into(),
            codes.iter().map(|c| c.hs_code.as_str()).collect::<Vec<&str>>(),
        ),
        Column::new(
            "HSN Description".into(),
            codes.iter().map(|c| c.hsn_description.as_str()).collect::<Vec<&str>>(),
        ),
        Column::new(
            "Total Value INR".into(),
            codes.iter().map(|c| c.total_value_inr).collect::<Vec<f64>>(),
        ),
        Column::new(
            "Duty Paid INR".into(),
            codes.iter().map(|c| c.duty_paid_inr).collect::<Vec<f64>>(),
        ),
        Column::new(
            "Grand Total INR".into(),
            codes.iter().map(|c| c.grand_total_inr).collect::<Vec<f64>>(),
        ),
        Column::new(
            "Contribution".into(),
            codes.iter().map(|c| c.contribution).collect::<Vec<f64>>(),
        ),
    ];

    Ok(DataFrame::new(columns)?)
}

/// Build the per-model frame
pub fn model_summary_dataframe(models: &[ModelSummary]) -> Result<DataFrame> {
    let columns = vec![
        Column::new(
            "Model Name".into(),
            models.iter().map(|m| m.model_name.as_str()).collect::<Vec<&str>>(),
        ),
        Column::new(
            "Total Quantity".into(),
            models.iter().map(|m| m.total_quantity).collect::<Vec<u64>>(),
        ),
        Column::new(
            "Total Value INR".into(),
            models.iter().map(|m| m.total_value_inr).collect::<Vec<f64>>(),
        ),
        Column::new(
            "Avg Unit Price USD".into(),
            models.iter().map(|m| m.avg_unit_price_usd).collect::<Vec<f64>>(),
        ),
        Column::new(
            "Avg Unit Price INR".into(),
            models.iter().map(|m| m.avg_unit_price_inr).collect::<Vec<f64>>(),
        ),
        Column::new("Share".into(), models.iter().map(|m| m.share).collect::<Vec<f64>>()),
    ];

    Ok(DataFrame::new(columns)?)
}

/// Build the per-importer frame
pub fn supplier_summary_dataframe(suppliers: &[SupplierSummary]) -> Result<DataFrame> {
    let columns = vec![
        Column::new(
            "IEC".into(),
            suppliers.iter().map(|s| s.iec.as_str()).collect::<Vec<&str>>(),
        ),
        Column::new(
            "Total Value INR".into(),
            suppliers.iter().map(|s| s.total_value_inr).collect::<Vec<f64>>(),
        ),
        Column::new(
            "Total Quantity".into(),
            suppliers.iter().map(|s| s.total_quantity).collect::<Vec<u64>>(),
        ),
        Column::new("Share".into(), suppliers.iter().map(|s| s.share).collect::<Vec<f64>>()),
    ];

    Ok(DataFrame::new(columns)?)
}

/// Build the lookup-table frame in HS code order
pub fn lookup_table_dataframe(table: &HsnTable) -> Result<DataFrame> {
    let mut entries: Vec<_> = table.entries().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));

    let columns = vec![
        Column::new(
            "HS Code".into(),
            entries.iter().map(|(code, _)| *code).collect::<Vec<&str>>(),
        ),
        Column::new(
            "HSN Description".into(),
            entries
                .iter()
                .map(|(_, entry)| entry.description.as_str())
                .collect::<Vec<&str>>(),
        ),
        Column::new(
            "Main Category".into(),
            entries
                .iter()
                .map(|(_, entry)| entry.category.as_str())
                .collect::<Vec<&str>>(),
        ),
    ];

    Ok(DataFrame::new(columns)?)
}

/// Write the four summaries into `dir`, one file each
///
/// Files are named after the summary (`year_summary`, `hsn_summary`,
/// `model_summary`, `supplier_summary`) with the extension of the configured
/// export format. Returns the paths written, in that order.
pub fn write_summaries(summary: &TradeSummary, dir: &Path, config: &TradeConfig) -> Result<Vec<PathBuf>> {
    let frames = [
        ("year_summary", year_summary_dataframe(&summary.years)?),
        ("hsn_summary", hsn_summary_dataframe(&summary.hs_codes)?),
        ("model_summary", model_summary_dataframe(&summary.models)?),
        ("supplier_summary", supplier_summary_dataframe(&summary.suppliers)?),
    ];

    let mut written = Vec::with_capacity(frames.len());
    for (name, mut df) in frames {
        let path = dir.join(format!("{}.{}", name, config.export_format.extension()));
        write_frame(&mut df, &path, config.export_format, config)?;
        written.push(path);
    }

    info!("Wrote {} summary files to {}", written.len(), dir.display());
    Ok(written)
}

/// Write the HS code lookup table in use to `path`
pub fn write_lookup_table(table: &HsnTable, path: &Path, config: &TradeConfig) -> Result<usize> {
    let mut df = lookup_table_dataframe(table)?;
    write_frame(&mut df, path, config.export_format_for(path), config)
}

fn write_frame(df: &mut DataFrame, path: &Path, format: ExportFormat, config: &TradeConfig) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;

    debug!(
        "Writing {} rows to {} as {:?}",
        df.height(),
        path.display(),
        format
    );

    let written = match format {
        ExportFormat::Parquet => ParquetWriter::new(file)
            .with_compression(config.compression.to_polars_compression())
            .finish(df)
            .map(|_| ()),
        ExportFormat::Csv => CsvWriter::new(file)
            .include_header(true)
            .with_separator(config.delimiter)
            .finish(df),
    };

    written.map_err(|e| TradeError::Export {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(df.height())
}
