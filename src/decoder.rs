//! Positional row decoding.
//!
//! Maps the fields of one delimited customs row onto a [`TradeRecord`] by
//! fixed position. Decoding never fails: missing positions become empty
//! text or zero, and malformed numbers degrade to zero.

use crate::constants::columns;
use crate::models::TradeRecord;
use tracing::debug;

/// Decode one row of fields into a trade record without derived fields
pub fn decode_row<S: AsRef<str>>(fields: &[S]) -> TradeRecord {
    let text = |index: usize| field(fields, index).to_string();
    let amount = |index: usize| coerce_amount(field(fields, index));

    TradeRecord {
        port_code: text(columns::PORT_CODE),
        date: text(columns::DATE),
        iec: text(columns::IEC),
        hs_code: text(columns::HS_CODE),
        goods_description: text(columns::GOODS_DESCRIPTION),
        model_name: text(columns::MODEL_NAME),
        model_number: text(columns::MODEL_NUMBER),
        capacity: text(columns::CAPACITY),
        quantity: coerce_quantity(field(fields, columns::QUANTITY)),
        unit: text(columns::UNIT),
        unit_price_inr: amount(columns::UNIT_PRICE_INR),
        total_value_inr: amount(columns::TOTAL_VALUE_INR),
        unit_price_usd: amount(columns::UNIT_PRICE_USD),
        total_value_usd: amount(columns::TOTAL_VALUE_USD),
        duty_paid_inr: amount(columns::DUTY_PAID_INR),
        ..Default::default()
    }
}

/// Get a field by position, treating positions past the end as empty
fn field<S: AsRef<str>>(fields: &[S], index: usize) -> &str {
    fields.get(index).map(|s| s.as_ref()).unwrap_or("")
}

/// Parse a monetary or numeric field, falling back to zero
///
/// Surrounding whitespace is ignored. Empty, non-numeric and non-finite
/// values all yield `0.0`.
pub fn coerce_amount(value: &str) -> f64 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() => number,
        _ => {
            debug!("Non-numeric value '{}' coerced to 0", trimmed);
            0.0
        }
    }
}

/// Parse a quantity field as a non-negative whole number, falling back to zero
///
/// Fractional quantities are truncated and negative ones clamp to zero.
pub fn coerce_quantity(value: &str) -> u64 {
    let trimmed = value.trim();
    if let Ok(quantity) = trimmed.parse::<u64>() {
        return quantity;
    }

    let number = coerce_amount(trimmed);
    if number <= 0.0 {
        0
    } else {
        // float-to-int casts saturate
        number.trunc() as u64
    }
}
