use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{ScenarioOutcome, StatementTotals};
use crate::calculations::brackets::progressive_tax;
use crate::calculations::common::{max, minimum_card_spending, round_half_up};
use crate::models::{IndividualBusinessInputs, ScenarioKind};

/// Share of a sole proprietor's tax due that is prepaid for the next year.
pub const INDIVIDUAL_PREPAYMENT_RATE: Decimal = dec!(0.55);

/// Sole-proprietorship figures for one fiscal year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualResult {
    pub result_before_tax: Decimal,
    pub adjusted_results: Decimal,
    pub taxable_results: Decimal,
    /// The larger of `taxable_results` and the deemed taxation.
    pub taxable_income: Decimal,
    pub tax_due: Decimal,
    pub prepayment_next_year: Decimal,
    pub total_tax_declaration: Decimal,
    pub minimum_card_spending: Decimal,
    pub total_income: Decimal,
    pub total_taxes: Decimal,
    pub net_income: Decimal,
}

/// Applies the presumptive floor to a declared result.
pub(crate) fn apply_deemed_floor(
    taxable_results: Decimal,
    deemed_taxation: Decimal,
) -> Decimal {
    let taxable_income = max(taxable_results, deemed_taxation);
    if taxable_income != taxable_results {
        if taxable_results < Decimal::ZERO {
            warn!(
                taxable_results = %taxable_results,
                deemed_taxation = %deemed_taxation,
                "deemed taxation overrides a declared loss"
            );
        } else {
            debug!(
                taxable_results = %taxable_results,
                deemed_taxation = %deemed_taxation,
                "deemed taxation exceeds declared result"
            );
        }
    }
    round_half_up(taxable_income)
}

/// `max(0, tax_due × 55% − |withholdings|)`.
pub(crate) fn individual_prepayment(
    tax_due: Decimal,
    business_withholdings: Decimal,
) -> Decimal {
    max(
        Decimal::ZERO,
        round_half_up(tax_due * INDIVIDUAL_PREPAYMENT_RATE - business_withholdings.abs()),
    )
}

/// Runs the sole-proprietorship pipeline.
///
/// ```
/// use rust_decimal_macros::dec;
/// use greek_tax_core::{IncomeStatement, IndividualBusinessInputs};
/// use greek_tax_core::calculations::calculate_individual_business;
///
/// let inputs = IndividualBusinessInputs {
///     statement: IncomeStatement {
///         net_turnover: dec!(40000),
///         other_expenses_losses: dec!(-15000),
///         ..Default::default()
///     },
///     ..Default::default()
/// };
///
/// let result = calculate_individual_business(&inputs);
/// assert_eq!(result.tax_due, dec!(4500.00));
/// assert_eq!(result.prepayment_next_year, dec!(2475.00));
/// ```
pub fn calculate_individual_business(inputs: &IndividualBusinessInputs) -> IndividualResult {
    let totals = StatementTotals::from_statement(&inputs.statement);
    let taxable_income = apply_deemed_floor(totals.taxable_results, inputs.deemed_taxation);
    let tax_due = progressive_tax(taxable_income);
    let prepayment_next_year = individual_prepayment(tax_due, inputs.business_withholdings);

    let total_tax_declaration = round_half_up(
        tax_due + prepayment_next_year + inputs.business_withholdings
            - inputs.previous_year_prepayment,
    );
    let minimum_card_spending = minimum_card_spending(taxable_income);

    let total_income = taxable_income;
    let total_taxes =
        round_half_up(tax_due + prepayment_next_year - inputs.previous_year_prepayment);
    let net_income = round_half_up(total_income - total_taxes);

    debug!(
        taxable_income = %taxable_income,
        tax_due = %tax_due,
        prepayment = %prepayment_next_year,
        declaration = %total_tax_declaration,
        net_income = %net_income,
        "individual business calculated"
    );

    IndividualResult {
        result_before_tax: totals.result_before_tax,
        adjusted_results: totals.adjusted_results,
        taxable_results: totals.taxable_results,
        taxable_income,
        tax_due,
        prepayment_next_year,
        total_tax_declaration,
        minimum_card_spending,
        total_income,
        total_taxes,
        net_income,
    }
}

impl ScenarioOutcome for IndividualResult {
    fn kind(&self) -> ScenarioKind {
        ScenarioKind::Individual
    }

    fn total_income(&self) -> Decimal {
        self.total_income
    }

    fn total_taxes(&self) -> Decimal {
        self.total_taxes
    }

    fn net_income(&self) -> Decimal {
        self.net_income
    }

    fn prepayment(&self) -> Decimal {
        self.prepayment_next_year
    }

    fn tax_declaration(&self) -> Decimal {
        self.total_tax_declaration
    }
}
