//! Aggregate summaries over enriched trade records.
//!
//! Groups records by year, HS code, model name and importer (IEC) and
//! computes totals, averages and each group's share of the overall value.
//! All functions are pure; records without the grouping key are left out
//! of that summary.

use crate::constants::UNKNOWN_HSN_DESCRIPTION;
use crate::models::TradeRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Totals for one calendar year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearSummary {
    pub year: i32,
    pub total_value_inr: f64,
    pub duty_paid_inr: f64,
    pub grand_total_inr: f64,
    /// Grand-total growth over the previous listed year, as a fraction
    pub yoy_growth: Option<f64>,
}

/// Totals for one HS code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HsnSummary {
    pub hs_code: String,
    pub hsn_description: String,
    pub total_value_inr: f64,
    pub duty_paid_inr: f64,
    pub grand_total_inr: f64,
    /// Fraction of the grand total across all HS codes
    pub contribution: f64,
}

/// Totals for one model name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub model_name: String,
    pub total_quantity: u64,
    pub total_value_inr: f64,
    pub avg_unit_price_usd: f64,
    pub avg_unit_price_inr: f64,
    /// Fraction of the total value across all models
    pub share: f64,
}

/// Totals for one importer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierSummary {
    pub iec: String,
    pub total_value_inr: f64,
    pub total_quantity: u64,
    /// Fraction of the total value across all importers
    pub share: f64,
}

/// Every summary for one batch of records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeSummary {
    pub record_count: usize,
    /// Grand total over every record, grouped or not
    pub grand_total_inr: f64,
    pub years: Vec<YearSummary>,
    pub hs_codes: Vec<HsnSummary>,
    pub models: Vec<ModelSummary>,
    pub suppliers: Vec<SupplierSummary>,
}

impl TradeSummary {
    /// Build all summaries from enriched records
    pub fn build(records: &[TradeRecord]) -> Self {
        Self {
            record_count: records.len(),
            grand_total_inr: records.iter().map(TradeRecord::grand_total).sum(),
            years: year_summary(records),
            hs_codes: hsn_summary(records),
            models: model_summary(records),
            suppliers: supplier_summary(records),
        }
    }
}

fn ratio(part: f64, whole: f64) -> f64 {
    if whole == 0.0 { 0.0 } else { part / whole }
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Per-year totals in ascending year order
pub fn year_summary(records: &[TradeRecord]) -> Vec<YearSummary> {
    let mut by_year: BTreeMap<i32, (f64, f64, f64)> = BTreeMap::new();

    for record in records {
        if let Some(year) = record.year {
            let totals = by_year.entry(year).or_default();
            totals.0 += record.total_value_inr;
            totals.1 += record.duty_paid_inr;
            totals.2 += record.grand_total();
        }
    }

    let mut previous: Option<f64> = None;
    by_year
        .into_iter()
        .map(|(year, (total_value_inr, duty_paid_inr, grand_total_inr))| {
            let yoy_growth = previous
                .filter(|prev| *prev != 0.0)
                .map(|prev| (grand_total_inr - prev) / prev);
            previous = Some(grand_total_inr);

            YearSummary {
                year,
                total_value_inr,
                duty_paid_inr,
                grand_total_inr,
                yoy_growth,
            }
        })
        .collect()
}

/// Per-HS-code totals in code order
pub fn hsn_summary(records: &[TradeRecord]) -> Vec<HsnSummary> {
    let mut by_code: BTreeMap<&str, HsnSummary> = BTreeMap::new();

    for record in records {
        let Some(code) = non_blank(&record.hs_code) else {
            continue;
        };

        let entry = by_code.entry(code).or_insert_with(|| HsnSummary {
            hs_code: code.to_string(),
            hsn_description: record
                .hsn_description
                .clone()
                .unwrap_or_else(|| UNKNOWN_HSN_DESCRIPTION.to_string()),
            total_value_inr: 0.0,
            duty_paid_inr: 0.0,
            grand_total_inr: 0.0,
            contribution: 0.0,
        });
        entry.total_value_inr += record.total_value_inr;
        entry.duty_paid_inr += record.duty_paid_inr;
        entry.grand_total_inr += record.grand_total();
    }

    let overall: f64 = by_code.values().map(|s| s.grand_total_inr).sum();
    by_code
        .into_values()
        .map(|mut summary| {
            summary.contribution = ratio(summary.grand_total_inr, overall);
            summary
        })
        .collect()
}

/// Per-model totals and average unit prices in model-name order
pub fn model_summary(records: &[TradeRecord]) -> Vec<ModelSummary> {
    #[derive(Default)]
    struct Accumulator {
        quantity: u64,
        value: f64,
        usd_prices: f64,
        inr_prices: f64,
        count: usize,
    }

    let mut by_model: BTreeMap<&str, Accumulator> = BTreeMap::new();
    for record in records {
        let Some(model) = non_blank(&record.model_name) else {
            continue;
        };

        let acc = by_model.entry(model).or_default();
        acc.quantity = acc.quantity.saturating_add(record.quantity);
        acc.value += record.total_value_inr;
        acc.usd_prices += record.unit_price_usd;
        acc.inr_prices += record.unit_price_inr;
        acc.count += 1;
    }

    let overall: f64 = by_model.values().map(|acc| acc.value).sum();
    by_model
        .into_iter()
        .map(|(model, acc)| {
            let count = acc.count as f64;
            ModelSummary {
                model_name: model.to_string(),
                total_quantity: acc.quantity,
                total_value_inr: acc.value,
                avg_unit_price_usd: acc.usd_prices / count,
                avg_unit_price_inr: acc.inr_prices / count,
                share: ratio(acc.value, overall),
            }
        })
        .collect()
}

/// Per-importer totals in IEC order
pub fn supplier_summary(records: &[TradeRecord]) -> Vec<SupplierSummary> {
    let mut by_iec: BTreeMap<&str, (f64, u64)> = BTreeMap::new();

    for record in records {
        if let Some(iec) = non_blank(&record.iec) {
            let totals = by_iec.entry(iec).or_default();
            totals.0 += record.total_value_inr;
            totals.1 = totals.1.saturating_add(record.quantity);
        }
    }

    let overall: f64 = by_iec.values().map(|(value, _)| value).sum();
    by_iec
        .into_iter()
        .map(|(iec, (total_value_inr, total_quantity))| SupplierSummary {
            iec: iec.to_string(),
            total_value_inr,
            total_quantity,
            share: ratio(total_value_inr, overall),
        })
        .collect()
}
