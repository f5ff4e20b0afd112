//! Core data structures for customs trade records.
//!
//! Defines the trade record itself, the product sub-categories recognised
//! in goods descriptions, the fragment extracted from a description and
//! the HS code lookup entry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Product sub-category detected from a goods description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SubCategory {
    Scrubber,
    Container,
    Basket,
    #[serde(rename = "Lunch Box")]
    LunchBox,
    Cutlery,
    Others,
}

impl SubCategory {
    /// Every sub-category, in keyword priority order with the fallback last
    pub const ALL: [SubCategory; 6] = [
        SubCategory::Scrubber,
        SubCategory::Container,
        SubCategory::Basket,
        SubCategory::LunchBox,
        SubCategory::Cutlery,
        SubCategory::Others,
    ];

    /// Human-readable label, as written to exports
    pub fn label(&self) -> &'static str {
        match self {
            SubCategory::Scrubber => "Scrubber",
            SubCategory::Container => "Container",
            SubCategory::Basket => "Basket",
            SubCategory::LunchBox => "Lunch Box",
            SubCategory::Cutlery => "Cutlery",
            SubCategory::Others => "Others",
        }
    }
}

impl fmt::Display for SubCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One customs import line item
///
/// Text fields use the empty string for "absent". The derived fields stay
/// `None` until the record passes through enrichment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub port_code: String,
    pub date: String,
    pub iec: String,
    pub hs_code: String,
    pub goods_description: String,
    pub model_name: String,
    pub model_number: String,
    pub capacity: String,
    pub quantity: u64,
    pub unit: String,
    pub unit_price_inr: f64,
    pub total_value_inr: f64,
    pub unit_price_usd: f64,
    pub total_value_usd: f64,
    pub duty_paid_inr: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hsn_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<SubCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grand_total_inr: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
}

impl TradeRecord {
    /// Whether the classification fields have been populated
    pub fn is_enriched(&self) -> bool {
        self.hsn_description.is_some()
            && self.main_category.is_some()
            && self.sub_category.is_some()
            && self.grand_total_inr.is_some()
    }

    /// Grand total if enriched, otherwise computed on the fly
    pub fn grand_total(&self) -> f64 {
        self.grand_total_inr
            .unwrap_or(self.total_value_inr + self.duty_paid_inr)
    }
}

/// Attributes extracted from a free-text goods description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptionFragment {
    pub quantity: Option<u64>,
    pub unit_price_usd: Option<f64>,
    pub model_name: Option<String>,
    pub sub_category: SubCategory,
}

impl Default for DescriptionFragment {
    fn default() -> Self {
        Self {
            quantity: None,
            unit_price_usd: None,
            model_name: None,
            sub_category: SubCategory::Others,
        }
    }
}

impl DescriptionFragment {
    /// Merge into a record; every extracted value overwrites the record's own
    pub fn apply_to(&self, record: &mut TradeRecord) {
        if let Some(quantity) = self.quantity {
            record.quantity = quantity;
        }
        if let Some(price) = self.unit_price_usd {
            record.unit_price_usd = price;
        }
        if let Some(model_name) = &self.model_name {
            record.model_name = model_name.clone();
        }
        record.sub_category = Some(self.sub_category);
    }
}

/// HS code classification entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsnEntry {
    pub description: String,
    pub category: String,
}

impl HsnEntry {
    pub fn new(description: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            category: category.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_category_labels() {
        assert_eq!(SubCategory::LunchBox.to_string(), "Lunch Box");
        assert_eq!(SubCategory::Others.label(), "Others");
        assert_eq!(SubCategory::ALL.len(), 6);
    }

    #[test]
    fn test_decoded_record_is_not_enriched() {
        let record = TradeRecord::default();
        assert!(!record.is_enriched());
        assert_eq!(record.year, None);
    }

    #[test]
    fn test_grand_total_falls_back_to_sum() {
        let record = TradeRecord {
            total_value_inr: 100.0,
            duty_paid_inr: 25.0,
            ..Default::default()
        };
        assert_eq!(record.grand_total(), 125.0);
    }

    #[test]
    fn test_fragment_overwrites_only_present_fields() {
        let mut record = TradeRecord {
            quantity: 7,
            unit_price_usd: 3.0,
            model_name: "RAW-1".to_string(),
            ..Default::default()
        };

        let fragment = DescriptionFragment {
            quantity: Some(50),
            unit_price_usd: None,
            model_name: Some("AB-100".to_string()),
            sub_category: SubCategory::Basket,
        };
        fragment.apply_to(&mut record);

        assert_eq!(record.quantity, 50);
        assert_eq!(record.unit_price_usd, 3.0);
        assert_eq!(record.model_name, "AB-100");
        assert_eq!(record.sub_category, Some(SubCategory::Basket));
    }
}
