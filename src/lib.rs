//! Trade Enricher Library
//!
//! A Rust library for turning customs import rows into classified trade
//! records.
//!
//! This library provides tools for:
//! - Decoding fixed-position delimited rows into typed trade records
//! - Extracting quantity, USD unit price, model name and product
//!   sub-category from free-text goods descriptions
//! - Enriching records with HS code classifications, grand totals and years
//! - Summarising records by year, HS code, model and importer
//! - Reading customs files and writing cleaned Parquet or CSV output
//!
//! The decoding, description parsing and enrichment functions never fail:
//! malformed input degrades to documented defaults.
//!
//! ```rust
//! use trade_enricher::{decode_row, enrich, HsnTable};
//!
//! let row = ["INNSA1", "2023-05-10", "0512345678", "73239990", "SS CONTAINER QTY: 50"];
//! let record = enrich(&decode_row(&row), HsnTable::builtin());
//!
//! assert_eq!(record.main_category.as_deref(), Some("Steel"));
//! assert_eq!(record.quantity, 50);
//! assert_eq!(record.year, Some(2023));
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod decoder;
pub mod description;
pub mod enrichment;
pub mod error;
pub mod hsn;
pub mod models;
pub mod reader;
pub mod summary;
pub mod writer;

// Re-export commonly used types
pub use config::TradeConfig;
pub use decoder::decode_row;
pub use description::parse_description;
pub use enrichment::{RecordEnricher, enrich};
pub use error::{Result, TradeError};
pub use hsn::HsnTable;
pub use models::{DescriptionFragment, HsnEntry, SubCategory, TradeRecord};
pub use summary::TradeSummary;
