//! Application constants for the trade enricher
//!
//! This module contains the fixed row layout, classification defaults,
//! the builtin HS code mapping and the cleaned-data column names used
//! throughout the application.

use crate::models::SubCategory;

// =============================================================================
// Row Layout
// =============================================================================

/// Positions of each attribute within a raw customs row
///
/// Position 5 and positions 9 to 12 carry columns this tool does not use.
pub mod columns {
    pub const PORT_CODE: usize = 0;
    pub const DATE: usize = 1;
    pub const IEC: usize = 2;
    pub const HS_CODE: usize = 3;
    pub const GOODS_DESCRIPTION: usize = 4;
    pub const MODEL_NAME: usize = 6;
    pub const MODEL_NUMBER: usize = 7;
    pub const CAPACITY: usize = 8;
    pub const QUANTITY: usize = 13;
    pub const UNIT: usize = 14;
    pub const UNIT_PRICE_INR: usize = 15;
    pub const TOTAL_VALUE_INR: usize = 16;
    pub const UNIT_PRICE_USD: usize = 17;
    pub const TOTAL_VALUE_USD: usize = 18;
    pub const DUTY_PAID_INR: usize = 19;

    /// Number of positions a complete row spans
    pub const ROW_WIDTH: usize = DUTY_PAID_INR + 1;
}

// =============================================================================
// Classification Defaults
// =============================================================================

/// HSN description assigned when an HS code is not in the lookup table
pub const UNKNOWN_HSN_DESCRIPTION: &str = "Unknown";

/// Main category assigned when an HS code is not in the lookup table
pub const DEFAULT_MAIN_CATEGORY: &str = "Others";

/// Builtin HS code mapping: (code, description, main category)
pub const BUILTIN_HSN_ENTRIES: &[(&str, &str, &str)] = &[
    (
        "73239990",
        "Household articles of iron or steel",
        "Steel",
    ),
    ("73239900", "Table, kitchen household articles", "Steel"),
    ("73211900", "Cooking appliances and plate warmers", "Steel"),
    ("73239300", "Kitchen or tableware", "Steel"),
];

/// Sub-category keywords in priority order; the first keyword found wins
pub const SUB_CATEGORY_KEYWORDS: &[(&str, SubCategory)] = &[
    ("scrubber", SubCategory::Scrubber),
    ("container", SubCategory::Container),
    ("basket", SubCategory::Basket),
    ("lunch box", SubCategory::LunchBox),
    ("cutlery", SubCategory::Cutlery),
];

// =============================================================================
// Description Patterns
// =============================================================================

/// Quantity marker followed by an integer, e.g. "QTY: 50"
pub const QUANTITY_PATTERN: &str = r"(?i)QTY[:\s]*([0-9]+)";

/// USD marker followed by a decimal price, e.g. "USD 12.5"
pub const UNIT_PRICE_USD_PATTERN: &str = r"(?i)USD[:\s]*([0-9]+(?:\.[0-9]+)?)";

/// Model marker followed by an alphanumeric model code, e.g. "MODEL: AB-100"
pub const MODEL_NAME_PATTERN: &str = r"(?i)MODEL[:\s]*((?-u:[A-Z0-9-])+)";

// =============================================================================
// Date Formats
// =============================================================================

/// Date-only formats tried, in order, when deriving the record year
pub const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%b %d, %Y",
];

/// Date-time formats tried after the date-only formats
pub const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

// =============================================================================
// Cleaned Data Output
// =============================================================================

/// Column headers of the cleaned-data export, in output order
pub const CLEANED_HEADERS: &[&str] = &[
    "Date",
    "Port Code",
    "IEC",
    "HS Code",
    "HSN Description",
    "Goods Description",
    "Main Category",
    "Sub Category",
    "Model Name",
    "Model Number",
    "Capacity",
    "Quantity",
    "Unit",
    "Unit Price INR",
    "Total Value INR",
    "Unit Price USD",
    "Total Value USD",
    "Duty Paid INR",
    "Grand Total INR",
    "Year",
];

/// Default delimiter for customs row files
pub const DEFAULT_DELIMITER: u8 = b',';

/// Log target used when no RUST_LOG filter is set
pub const LOG_TARGET: &str = "trade_enricher";
