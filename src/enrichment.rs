//! Trade record enrichment
//!
//! Derives the classification and summary fields of a decoded trade record:
//! HSN description and main category from the HS code lookup table, the
//! grand total, the calendar year and the attributes parsed from the goods
//! description. Enrichment never fails; every missing or malformed input
//! falls back to a default.

use crate::constants::{
    DATE_FORMATS, DATETIME_FORMATS, DEFAULT_MAIN_CATEGORY, UNKNOWN_HSN_DESCRIPTION,
};
use crate::decoder::decode_row;
use crate::description::parse_description;
use crate::hsn::HsnTable;
use crate::models::TradeRecord;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use tracing::{debug, warn};

/// Return a copy of `record` with every derived field populated
///
/// # Arguments
///
/// * `record` - Decoded record; left untouched
/// * `table` - HS code lookup table
///
/// # Returns
///
/// New record carrying the original fields, the derived fields, and the
/// attributes parsed from the goods description (which overwrite the
/// record's own quantity, USD unit price and model name when found)
pub fn enrich(record: &TradeRecord, table: &HsnTable) -> TradeRecord {
    let mut enriched = record.clone();

    match table.lookup(&record.hs_code) {
        Some(entry) => {
            enriched.hsn_description = Some(entry.description.clone());
            enriched.main_category = Some(entry.category.clone());
        }
        None => {
            debug!("HS code '{}' not in lookup table", record.hs_code);
            enriched.hsn_description = Some(UNKNOWN_HSN_DESCRIPTION.to_string());
            enriched.main_category = Some(DEFAULT_MAIN_CATEGORY.to_string());
        }
    }

    enriched.grand_total_inr = Some(record.total_value_inr + record.duty_paid_inr);

    if !record.date.trim().is_empty() {
        enriched.year = derive_year(&record.date);
        if enriched.year.is_none() {
            warn!(
                "Unparseable date '{}' for HS code '{}'; year left unset",
                record.date, record.hs_code
            );
        }
    }

    parse_description(&record.goods_description).apply_to(&mut enriched);

    enriched
}

/// Decode a raw row and enrich it in one step
pub fn process_row<S: AsRef<str>>(fields: &[S], table: &HsnTable) -> TradeRecord {
    enrich(&decode_row(fields), table)
}

/// Extract the calendar year from a date string
///
/// Tries RFC 3339 first, then the date-only and date-time formats in
/// [`DATE_FORMATS`] and [`DATETIME_FORMATS`]. Returns `None` when no format
/// matches.
pub fn derive_year(date: &str) -> Option<i32> {
    let trimmed = date.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.year());
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .map(|d| d.year())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
                .map(|dt| dt.year())
        })
}

/// Enricher bound to one HS code lookup table
#[derive(Debug, Clone)]
pub struct RecordEnricher {
    table: HsnTable,
}

impl Default for RecordEnricher {
    fn default() -> Self {
        Self::new(HsnTable::builtin().clone())
    }
}

impl RecordEnricher {
    /// Create an enricher over the given lookup table
    pub fn new(table: HsnTable) -> Self {
        Self { table }
    }

    /// Lookup table in use
    pub fn table(&self) -> &HsnTable {
        &self.table
    }

    /// Enrich a single record
    pub fn enrich(&self, record: &TradeRecord) -> TradeRecord {
        enrich(record, &self.table)
    }

    /// Enrich every record, preserving order
    pub fn enrich_all(&self, records: &[TradeRecord]) -> Vec<TradeRecord> {
        let enriched: Vec<TradeRecord> = records.iter().map(|r| self.enrich(r)).collect();

        let unmapped = enriched
            .iter()
            .filter(|r| !self.table.contains(&r.hs_code))
            .count();
        debug!(
            "Enriched {} records ({} with unmapped HS codes)",
            enriched.len(),
            unmapped
        );

        enriched
    }

    /// Decode and enrich a raw row
    pub fn process_row<S: AsRef<str>>(&self, fields: &[S]) -> TradeRecord {
        process_row(fields, &self.table)
    }
}
