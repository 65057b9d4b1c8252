//! Validation boundary for monetary input.
//!
//! The engine works on [`Decimal`] and is total over it. Everything that turns
//! outside data (form text, CSV cells, floating-point columns) into amounts goes
//! through this module first: absent values become zero, anything that is not
//! a finite number is rejected with the offending field named.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

/// Rejected numeric input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidAmount {
    #[error("{field}: '{input}' is not a valid amount")]
    NotANumber { field: String, input: String },

    #[error("{field}: non-finite value {value}")]
    NonFinite { field: String, value: String },
}

/// Parses a textual amount.
///
/// Empty or whitespace-only input is an absent field and yields zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use greek_tax_core::models::amount::parse_amount;
///
/// assert_eq!(parse_amount("net_turnover", " 57788.06 "), Ok(dec!(57788.06)));
/// assert_eq!(parse_amount("net_turnover", ""), Ok(dec!(0)));
/// assert!(parse_amount("net_turnover", "NaN").is_err());
/// ```
pub fn parse_amount(
    field: &str,
    input: &str,
) -> Result<Decimal, InvalidAmount> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(Decimal::ZERO);
    }

    Decimal::from_str(trimmed).map_err(|_| InvalidAmount::NotANumber {
        field: field.to_string(),
        input: input.to_string(),
    })
}

/// Converts a floating-point amount, rejecting NaN and infinities.
///
/// The conversion goes through the shortest round-trip representation of the
/// float, so `0.1` becomes exactly `0.1` rather than its binary expansion.
pub fn amount_from_f64(
    field: &str,
    value: f64,
) -> Result<Decimal, InvalidAmount> {
    if !value.is_finite() {
        return Err(InvalidAmount::NonFinite {
            field: field.to_string(),
            value: value.to_string(),
        });
    }

    let text = value.to_string();
    Decimal::from_str(&text).map_err(|_| InvalidAmount::NotANumber {
        field: field.to_string(),
        input: text,
    })
}
