use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ScenarioOutcome, StatementTotals};
use crate::calculations::common::round_half_up;
use crate::calculations::corporate::corporate_tax;
use crate::models::{CompanyInputs, ScenarioKind};

/// Share of a company's tax due that is prepaid for the next year.
pub const COMPANY_PREPAYMENT_RATE: Decimal = dec!(0.80);

/// Incorporated-company figures for one fiscal year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyResult {
    pub result_before_tax: Decimal,
    pub adjusted_results: Decimal,
    pub taxable_results: Decimal,
    pub tax_due: Decimal,
    pub prepayment_next_year: Decimal,
    pub total_tax_declaration: Decimal,
    pub total_income: Decimal,
    pub total_taxes: Decimal,
    pub net_income: Decimal,
}

/// Runs the company pipeline.
///
/// Unlike the sole-proprietorship prepayment, the company prepayment *adds*
/// the withholdings and has no floor.
pub fn calculate_company(inputs: &CompanyInputs) -> CompanyResult {
    let totals = StatementTotals::from_statement(&inputs.statement);
    let tax_due = corporate_tax(totals.taxable_results);
    let prepayment_next_year =
        round_half_up(tax_due * COMPANY_PREPAYMENT_RATE + inputs.business_withholdings);

    let total_tax_declaration = round_half_up(
        tax_due + prepayment_next_year + inputs.business_withholdings
            - inputs.previous_year_prepayment
            + inputs.professional_fee,
    );

    let total_income = totals.taxable_results;
    let total_taxes = round_half_up(
        tax_due + prepayment_next_year - inputs.previous_year_prepayment + inputs.professional_fee,
    );
    let net_income = round_half_up(total_income - total_taxes);

    debug!(
        taxable_results = %totals.taxable_results,
        tax_due = %tax_due,
        prepayment = %prepayment_next_year,
        declaration = %total_tax_declaration,
        net_income = %net_income,
        "company calculated"
    );

    CompanyResult {
        result_before_tax: totals.result_before_tax,
        adjusted_results: totals.adjusted_results,
        taxable_results: totals.taxable_results,
        tax_due,
        prepayment_next_year,
        total_tax_declaration,
        total_income,
        total_taxes,
        net_income,
    }
}

impl ScenarioOutcome for CompanyResult {
    fn kind(&self) -> ScenarioKind {
        ScenarioKind::Company
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
