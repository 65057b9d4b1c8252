//! Rounding and small helpers shared by every scenario calculator.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Share of taxable income that must be spent by card.
pub const CARD_SPENDING_RATE: Decimal = dec!(0.30);

/// Upper bound of the card-spending requirement.
pub const CARD_SPENDING_CAP: Decimal = dec!(20000);

/// Rounds to cents, midpoint away from zero.
///
/// This is the rounding applied after every formula step in the engine, and it
/// agrees with the reference spreadsheet's `ROUND(x; 2)` at `.005` boundaries.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use greek_tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(1269.147)), dec!(1269.15));
/// assert_eq!(round_half_up(dec!(2.345)), dec!(2.35));
/// assert_eq!(round_half_up(dec!(-2.345)), dec!(-2.35));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two amounts.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Returns the smaller of two amounts.
pub fn min(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a < b { a } else { b }
}

/// Year-over-year change of a reported figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PercentageChange {
    /// Both years are zero; rendered as `-`.
    Undefined,
    Value(Decimal),
}

impl PercentageChange {
    pub fn value(&self) -> Option<Decimal> {
        match self {
            Self::Undefined => None,
            Self::Value(v) => Some(*v),
        }
    }
}

/// Percentage change of `current` over `previous`, on absolute magnitudes.
///
/// When `previous` is zero and `current` is not, the reference form reports
/// `|current|` itself rather than a percentage. That asymmetry is kept.
///
/// ```
/// use rust_decimal_macros::dec;
/// use greek_tax_core::calculations::{PercentageChange, percentage_change};
///
/// assert_eq!(percentage_change(dec!(0), dec!(0)), PercentageChange::Undefined);
/// assert_eq!(percentage_change(dec!(-150), dec!(0)), PercentageChange::Value(dec!(150)));
/// assert_eq!(percentage_change(dec!(120), dec!(100)), PercentageChange::Value(dec!(20)));
/// ```
pub fn percentage_change(
    current: Decimal,
    previous: Decimal,
) -> PercentageChange {
    if previous.is_zero() {
        if current.is_zero() {
            return PercentageChange::Undefined;
        }
        return PercentageChange::Value(round_half_up(current.abs()));
    }

    let previous = previous.abs();
    PercentageChange::Value(round_half_up(
        (current.abs() - previous) / previous * dec!(100),
    ))
}

/// Card spending required to avoid a surcharge: 30% of the taxable base,
/// capped at 20 000.
///
/// Scenario bases are floored by deemed taxation, so they only go negative
/// when a caller passes a negative `deemed_taxation`. The figure is then
/// negative too and is reported as is.
pub fn minimum_card_spending(taxable_income: Decimal) -> Decimal {
    round_half_up(min(taxable_income * CARD_SPENDING_RATE, CARD_SPENDING_CAP))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(2307.5424)), dec!(2307.54));
    }

    #[test]
    fn round_half_up_rounds_away_from_zero_at_midpoint() {
        assert_eq!(round_half_up(dec!(0.005)), dec!(0.01));
        assert_eq!(round_half_up(dec!(0.015)), dec!(0.02));
        assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01));
    }

    #[test]
    fn round_half_up_is_not_bankers_rounding() {
        // Half-to-even would give 0.02 for both.
        assert_eq!(round_half_up(dec!(0.025)), dec!(0.03));
        assert_eq!(round_half_up(dec!(0.035)), dec!(0.04));
    }

    #[test]
    fn round_half_up_preserves_already_rounded_values() {
        assert_eq!(round_half_up(dec!(16397.92)), dec!(16397.92));
    }

    // =========================================================================
    // max / min tests
    // =========================================================================

    #[test]
    fn max_picks_larger_value() {
        assert_eq!(max(dec!(-1977.87), dec!(16397.92)), dec!(16397.92));
        assert_eq!(max(dec!(21281.29), dec!(14701.11)), dec!(21281.29));
    }

    #[test]
    fn min_picks_smaller_value() {
        assert_eq!(min(dec!(30000), dec!(20000)), dec!(20000));
        assert_eq!(min(dec!(-5), dec!(0)), dec!(-5));
    }

    // =========================================================================
    // percentage_change tests
    // =========================================================================

    #[test]
    fn percentage_change_is_undefined_when_both_zero() {
        assert_eq!(
            percentage_change(dec!(0), dec!(0)),
            PercentageChange::Undefined
        );
        assert_eq!(PercentageChange::Undefined.value(), None);
    }

    #[test]
    fn percentage_change_returns_magnitude_when_previous_is_zero() {
        assert_eq!(
            percentage_change(dec!(1269.15), dec!(0)),
            PercentageChange::Value(dec!(1269.15))
        );
    }

    #[test]
    fn percentage_change_uses_absolute_values() {
        // |-1977.87| vs |21281.29|
        assert_eq!(
            percentage_change(dec!(-1977.87), dec!(21281.29)),
            PercentageChange::Value(dec!(-90.71))
        );
    }

    #[test]
    fn percentage_change_rounds_to_cents() {
        assert_eq!(
            percentage_change(dec!(16397.92), dec!(21281.29)),
            PercentageChange::Value(dec!(-22.95))
        );
    }

    // =========================================================================
    // minimum_card_spending tests
    // =========================================================================

    #[test]
    fn minimum_card_spending_is_thirty_percent() {
        assert_eq!(minimum_card_spending(dec!(10000)), dec!(3000.00));
        assert_eq!(minimum_card_spending(dec!(16397.92)), dec!(4919.38));
    }

    #[test]
    fn minimum_card_spending_is_capped() {
        assert_eq!(minimum_card_spending(dec!(100000)), dec!(20000));
        assert_eq!(minimum_card_spending(dec!(66666.67)), dec!(20000));
    }

    #[test]
    fn minimum_card_spending_is_not_floored() {
        assert_eq!(minimum_card_spending(dec!(-1000)), dec!(-300.00));
    }
}
