//! Marginal rate tables: personal income tax and the solidarity contribution.
//!
//! Both levies use the same accumulation rule. The tax for an income is the
//! quota of every band below it (`base_tax`) plus the band's rate applied to
//! the slice above the band's lower bound. Only one table of each kind exists;
//! there is no per-year lookup.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::trace;

use crate::calculations::common::round_half_up;
use crate::models::TaxBracket;

/// Personal income tax bands.
///
/// | Band               | Rate | Quota below |
/// |--------------------|------|-------------|
/// | 0 – 10 000         | 9%   | 0           |
/// | 10 000 – 20 000    | 22%  | 900         |
/// | 20 000 – 30 000    | 28%  | 3 100       |
/// | 30 000 – 40 000    | 36%  | 5 900       |
/// | over 40 000        | 44%  | 9 500       |
const INCOME_TAX_BRACKETS: [TaxBracket; 5] = [
    bracket(dec!(0), Some(dec!(10000)), dec!(0.09), dec!(0)),
    bracket(dec!(10000), Some(dec!(20000)), dec!(0.22), dec!(900)),
    bracket(dec!(20000), Some(dec!(30000)), dec!(0.28), dec!(3100)),
    bracket(dec!(30000), Some(dec!(40000)), dec!(0.36), dec!(5900)),
    bracket(dec!(40000), None, dec!(0.44), dec!(9500)),
];

/// Solidarity contribution bands.
const SOLIDARITY_BRACKETS: [TaxBracket; 7] = [
    bracket(dec!(0), Some(dec!(12000)), dec!(0), dec!(0)),
    bracket(dec!(12000), Some(dec!(20000)), dec!(0.022), dec!(0)),
    bracket(dec!(20000), Some(dec!(30000)), dec!(0.05), dec!(176)),
    bracket(dec!(30000), Some(dec!(40000)), dec!(0.065), dec!(676)),
    bracket(dec!(40000), Some(dec!(65000)), dec!(0.075), dec!(1326)),
    bracket(dec!(65000), Some(dec!(220000)), dec!(0.09), dec!(3201)),
    bracket(dec!(220000), None, dec!(0.10), dec!(17151)),
];

const fn bracket(
    min_income: Decimal,
    max_income: Option<Decimal>,
    tax_rate: Decimal,
    base_tax: Decimal,
) -> TaxBracket {
    TaxBracket {
        min_income,
        max_income,
        tax_rate,
        base_tax,
    }
}

/// An ordered marginal rate table.
///
/// Bands are contiguous, strictly increasing and the last one is unbounded.
#[derive(Debug, Clone, Copy)]
pub struct BracketSchedule {
    name: &'static str,
    brackets: &'static [TaxBracket],
}

pub const INCOME_TAX_SCHEDULE: BracketSchedule = BracketSchedule {
    name: "income_tax",
    brackets: &INCOME_TAX_BRACKETS,
};

pub const SOLIDARITY_SCHEDULE: BracketSchedule = BracketSchedule {
    name: "solidarity",
    brackets: &SOLIDARITY_BRACKETS,
};

impl BracketSchedule {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn brackets(&self) -> &'static [TaxBracket] {
        self.brackets
    }

    /// The band `income` falls in, or `None` for non-positive income.
    pub fn bracket_for(
        &self,
        income: Decimal,
    ) -> Option<&'static TaxBracket> {
        self.brackets.iter().find(|b| b.contains(income))
    }

    /// Tax on `income`, rounded to cents. Zero for non-positive income.
    pub fn tax_on(
        &self,
        income: Decimal,
    ) -> Decimal {
        let Some(band) = self.bracket_for(income) else {
            return Decimal::ZERO;
        };

        let tax = round_half_up(band.base_tax + (income - band.min_income) * band.tax_rate);
        trace!(
            schedule = self.name,
            income = %income,
            band_floor = %band.min_income,
            tax = %tax,
            "bracket tax"
        );
        tax
    }
}

/// Personal income tax on `income`.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use greek_tax_core::calculations::progressive_tax;
///
/// assert_eq!(progressive_tax(dec!(10000)), dec!(900.00));
/// assert_eq!(progressive_tax(dec!(25000)), dec!(4500.00));
/// assert_eq!(progressive_tax(dec!(-500)), dec!(0));
/// ```
pub fn progressive_tax(income: Decimal) -> Decimal {
    INCOME_TAX_SCHEDULE.tax_on(income)
}

/// Solidarity contribution on a personal income base.
///
/// Nothing is due up to 12 000.
pub fn solidarity_contribution(income: Decimal) -> Decimal {
    SOLIDARITY_SCHEDULE.tax_on(income)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn assert_quotas_accumulate(schedule: &BracketSchedule) {
        let bands = schedule.brackets();
        assert_eq!(bands[0].min_income, Decimal::ZERO);
        assert_eq!(bands[0].base_tax, Decimal::ZERO);
        assert!(bands[bands.len() - 1].max_income.is_none());

        for pair in bands.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            let lower_max = lower.max_income.expect("only the last band is open");
            assert_eq!(lower_max, upper.min_income, "{} bands must be contiguous", schedule.name());
            assert!(upper.min_income > lower.min_income);
            assert_eq!(
                upper.base_tax,
                lower.base_tax + (lower_max - lower.min_income) * lower.tax_rate,
                "{} quota at {}",
                schedule.name(),
                upper.min_income
            );
        }
    }

    // =========================================================================
    // table shape
    // =========================================================================

    #[test]
    fn income_tax_quotas_match_lower_bands() {
        assert_quotas_accumulate(&INCOME_TAX_SCHEDULE);
    }

    #[test]
    fn solidarity_quotas_match_lower_bands() {
        assert_quotas_accumulate(&SOLIDARITY_SCHEDULE);
    }

    // =========================================================================
    // progressive_tax
    // =========================================================================

    #[test]
    fn progressive_tax_is_zero_for_non_positive_income() {
        assert_eq!(progressive_tax(dec!(0)), dec!(0));
        assert_eq!(progressive_tax(dec!(-1977.87)), dec!(0));
        assert_eq!(progressive_tax(dec!(-0.01)), dec!(0));
    }

    #[test]
    fn progressive_tax_at_band_boundaries() {
        assert_eq!(progressive_tax(dec!(10000)), dec!(900.00));
        assert_eq!(progressive_tax(dec!(20000)), dec!(3100.00));
        assert_eq!(progressive_tax(dec!(30000)), dec!(5900.00));
        assert_eq!(progressive_tax(dec!(40000)), dec!(9500.00));
    }

    #[test]
    fn progressive_tax_inside_bands() {
        assert_eq!(progressive_tax(dec!(5000)), dec!(450.00));
        assert_eq!(progressive_tax(dec!(25000)), dec!(4500.00));
        assert_eq!(progressive_tax(dec!(16397.92)), dec!(2307.54));
        assert_eq!(progressive_tax(dec!(21281.29)), dec!(3458.76));
        assert_eq!(progressive_tax(dec!(50000)), dec!(13900.00));
    }

    #[test]
    fn progressive_tax_is_marginal_not_flat() {
        // A flat top rate on the whole income would give 25000 * 0.28 = 7000.
        assert!(progressive_tax(dec!(25000)) < dec!(25000) * dec!(0.28));
        // And 100000 * 0.44 = 44000.
        assert_eq!(progressive_tax(dec!(100000)), dec!(35900.00));
    }

    #[test]
    fn progressive_tax_rounds_each_result_half_away_from_zero() {
        // 900 + 0.75 * 0.22 = 900.165
        assert_eq!(progressive_tax(dec!(10000.75)), dec!(900.17));
    }

    #[test]
    fn progressive_tax_is_continuous_across_boundaries() {
        assert_eq!(progressive_tax(dec!(10000.01)), dec!(900.00));
        assert_eq!(progressive_tax(dec!(40000.01)), dec!(9500.00));
    }

    // =========================================================================
    // solidarity_contribution
    // =========================================================================

    #[test]
    fn solidarity_is_zero_up_to_twelve_thousand() {
        assert_eq!(solidarity_contribution(dec!(-100)), dec!(0));
        assert_eq!(solidarity_contribution(dec!(0)), dec!(0));
        assert_eq!(solidarity_contribution(dec!(12000)), dec!(0));
    }

    #[test]
    fn solidarity_inside_bands() {
        assert_eq!(solidarity_contribution(dec!(15000)), dec!(66.00));
        assert_eq!(solidarity_contribution(dec!(25000)), dec!(426.00));
        assert_eq!(solidarity_contribution(dec!(35000)), dec!(1001.00));
        assert_eq!(solidarity_contribution(dec!(50000)), dec!(2076.00));
        assert_eq!(solidarity_contribution(dec!(100000)), dec!(6351.00));
        assert_eq!(solidarity_contribution(dec!(300000)), dec!(25151.00));
    }

    #[test]
    fn solidarity_at_band_boundaries() {
        assert_eq!(solidarity_contribution(dec!(20000)), dec!(176.00));
        assert_eq!(solidarity_contribution(dec!(65000)), dec!(3201.00));
        assert_eq!(solidarity_contribution(dec!(220000)), dec!(17151.00));
    }

    #[test]
    fn bracket_for_finds_band() {
        let band = INCOME_TAX_SCHEDULE
            .bracket_for(dec!(16397.92))
            .expect("positive income has a band");
        assert_eq!(band.min_income, dec!(10000));
        assert_eq!(band.tax_rate, dec!(0.22));

        assert!(INCOME_TAX_SCHEDULE.bracket_for(dec!(0)).is_none());
    }
}
