use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::calculations::common::round_half_up;

/// Flat corporate income tax rate.
pub const CORPORATE_TAX_RATE: Decimal = dec!(0.22);

/// Corporate income tax: a flat 22% of positive taxable results.
///
/// Losses carry no negative tax and there is no presumptive floor for
/// companies.
pub fn corporate_tax(income: Decimal) -> Decimal {
    if income > Decimal::ZERO {
        round_half_up(income * CORPORATE_TAX_RATE)
    } else {
        Decimal::ZERO
    }
}
