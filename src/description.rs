//! Goods description parsing.
//!
//! Pulls a quantity, a USD unit price, a model name and a product
//! sub-category out of the free-text goods description with
//! case-insensitive pattern matching. Anything not found is left `None`,
//! except the sub-category which falls back to [`SubCategory::Others`].

use crate::constants::{
    MODEL_NAME_PATTERN, QUANTITY_PATTERN, SUB_CATEGORY_KEYWORDS, UNIT_PRICE_USD_PATTERN,
};
use crate::models::{DescriptionFragment, SubCategory};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static QUANTITY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(QUANTITY_PATTERN).expect("quantity pattern is valid"));

static UNIT_PRICE_USD_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(UNIT_PRICE_USD_PATTERN).expect("USD pattern is valid"));

static MODEL_NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(MODEL_NAME_PATTERN).expect("model pattern is valid"));

/// Extract structured attributes from a goods description
pub fn parse_description(text: &str) -> DescriptionFragment {
    let clean = text.trim();

    DescriptionFragment {
        quantity: first_capture(&QUANTITY_REGEX, clean).and_then(|qty| {
            qty.parse::<u64>()
                .inspect_err(|e| debug!("Quantity '{}' out of range: {}", qty, e))
                .ok()
        }),
        unit_price_usd: first_capture(&UNIT_PRICE_USD_REGEX, clean)
            .and_then(|price| price.parse::<f64>().ok()),
        model_name: first_capture(&MODEL_NAME_REGEX, clean).map(str::to_string),
        sub_category: detect_sub_category(clean),
    }
}

/// Parse an optional description, treating `None` as empty text
pub fn parse_description_opt(text: Option<&str>) -> DescriptionFragment {
    parse_description(text.unwrap_or_default())
}

/// Pick the first sub-category whose keyword appears anywhere in the text
pub fn detect_sub_category(text: &str) -> SubCategory {
    let lower = text.to_lowercase();

    SUB_CATEGORY_KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, category)| *category)
        .unwrap_or(SubCategory::Others)
}

fn first_capture<'t>(regex: &Regex, text: &'t str) -> Option<&'t str> {
    regex
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
