use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::individual::{apply_deemed_floor, individual_prepayment};
use super::{ScenarioOutcome, StatementTotals};
use crate::calculations::brackets::{progressive_tax, solidarity_contribution};
use crate::calculations::common::{max, minimum_card_spending, round_half_up};
use crate::models::{EmployeeInputs, IndividualBusinessInputs, ScenarioKind};

/// Sole proprietorship plus wage income, taxed together on one progressive
/// base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeResult {
    pub result_before_tax: Decimal,
    pub adjusted_results: Decimal,
    pub taxable_results: Decimal,
    pub employee_income: Decimal,
    pub total_taxable_income: Decimal,
    pub total_income_tax: Decimal,
    pub tax_reductions: Decimal,
    pub net_tax_due: Decimal,
    /// Tax on the business income alone; sizes the prepayment.
    pub business_tax_only: Decimal,
    pub prepayment_next_year: Decimal,
    pub employee_withholdings: Decimal,
    pub business_withholdings: Decimal,
    pub previous_year_prepayment: Decimal,
    pub total_tax_declaration: Decimal,
    pub minimum_card_spending: Decimal,
    pub solidarity_contribution: Decimal,
    pub total_income: Decimal,
    pub total_taxes: Decimal,
    pub net_income: Decimal,
}

/// Runs the combined business + wages pipeline.
///
/// Wages are added on both sides of the deemed comparison, so the presumptive
/// floor only ever replaces the business leg. The prepayment is sized from the
/// business leg alone; wages are already withheld at source.
pub fn calculate_employee_income(
    business: &IndividualBusinessInputs,
    employee: &EmployeeInputs,
) -> EmployeeResult {
    let totals = StatementTotals::from_statement(&business.statement);
    let employee_income = round_half_up(employee.employee_income);

    let total_taxable_income = round_half_up(max(
        totals.taxable_results + employee_income,
        business.deemed_taxation + employee_income,
    ));
    let total_income_tax = progressive_tax(total_taxable_income);
    let net_tax_due = max(
        Decimal::ZERO,
        round_half_up(total_income_tax - employee.tax_reductions),
    );

    let business_income = apply_deemed_floor(totals.taxable_results, business.deemed_taxation);
    let business_tax_only = progressive_tax(business_income);
    let prepayment_next_year = individual_prepayment(business_tax_only, business.business_withholdings);

    let total_tax_declaration = round_half_up(
        net_tax_due + prepayment_next_year + employee.employee_withholdings
            + business.business_withholdings
            - business.previous_year_prepayment,
    );
    let minimum_card_spending = minimum_card_spending(total_taxable_income);
    let solidarity_contribution = solidarity_contribution(total_taxable_income);

    let total_income = total_taxable_income;
    let total_taxes = round_half_up(
        net_tax_due + solidarity_contribution + prepayment_next_year
            - business.previous_year_prepayment,
    );
    let net_income = round_half_up(total_income - total_taxes);

    debug!(
        total_taxable_income = %total_taxable_income,
        net_tax_due = %net_tax_due,
        business_tax_only = %business_tax_only,
        solidarity = %solidarity_contribution,
        net_income = %net_income,
        "business with wages calculated"
    );

    EmployeeResult {
        result_before_tax: totals.result_before_tax,
        adjusted_results: totals.adjusted_results,
        taxable_results: totals.taxable_results,
        employee_income,
        total_taxable_income,
        total_income_tax,
        tax_reductions: round_half_up(employee.tax_reductions),
        net_tax_due,
        business_tax_only,
        prepayment_next_year,
        employee_withholdings: round_half_up(employee.employee_withholdings),
        business_withholdings: round_half_up(business.business_withholdings),
        previous_year_prepayment: round_half_up(business.previous_year_prepayment),
        total_tax_declaration,
        minimum_card_spending,
        solidarity_contribution,
        total_income,
        total_taxes,
        net_income,
    }
}

impl ScenarioOutcome for EmployeeResult {
    fn kind(&self) -> ScenarioKind {
        ScenarioKind::Employee
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
