use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    CompanyResult, IndividualResult, ScenarioOutcome, calculate_company,
    calculate_individual_business,
};
use crate::calculations::brackets::{progressive_tax, solidarity_contribution};
use crate::calculations::common::{max, minimum_card_spending, round_half_up};
use crate::models::{CompanyInputs, EmployeeInputs, IndividualBusinessInputs, ScenarioKind};

/// Sole proprietorship, company and wages together.
///
/// The company leg is taxed on its own at the flat rate. Business and wage
/// income form one personal base under the progressive and solidarity tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullCombinedResult {
    pub individual: IndividualResult,
    pub company: CompanyResult,

    /// Individual taxable income plus wages.
    pub personal_taxable_income: Decimal,
    pub personal_gross_tax: Decimal,
    pub personal_tax_due: Decimal,
    pub solidarity_contribution: Decimal,
    /// Same as the individual leg's prepayment: wages do not enter it.
    pub personal_prepayment: Decimal,
    pub minimum_card_spending: Decimal,

    pub total_gross_income: Decimal,
    /// Personal tax, solidarity, company tax and the professional fee.
    pub total_taxes: Decimal,
    pub total_prepayments: Decimal,
    pub overall_tax_declaration: Decimal,
    /// `total_taxes + total_prepayments` less each entity's previous-year
    /// prepayment, subtracted once.
    pub total_tax_burden: Decimal,
    pub total_net_income: Decimal,
}

pub fn calculate_full_combined(
    individual_inputs: &IndividualBusinessInputs,
    company_inputs: &CompanyInputs,
    employee: &EmployeeInputs,
) -> FullCombinedResult {
    let individual = calculate_individual_business(individual_inputs);
    let company = calculate_company(company_inputs);

    let personal_taxable_income =
        round_half_up(individual.taxable_income + employee.employee_income);
    let personal_gross_tax = progressive_tax(personal_taxable_income);
    let personal_tax_due = max(
        Decimal::ZERO,
        round_half_up(personal_gross_tax - employee.tax_reductions),
    );
    let solidarity_contribution = solidarity_contribution(personal_taxable_income);
    let personal_prepayment = individual.prepayment_next_year;
    let minimum_card_spending = minimum_card_spending(personal_taxable_income);

    let total_gross_income = round_half_up(personal_taxable_income + company.taxable_results);
    let total_taxes = round_half_up(
        personal_tax_due + solidarity_contribution + company.tax_due
            + company_inputs.professional_fee,
    );
    let total_prepayments = round_half_up(personal_prepayment + company.prepayment_next_year);

    let overall_tax_declaration = round_half_up(
        personal_tax_due
            + personal_prepayment
            + employee.employee_withholdings
            + individual_inputs.business_withholdings
            + company.total_tax_declaration
            - individual_inputs.previous_year_prepayment,
    );

    let total_tax_burden = round_half_up(
        total_taxes + total_prepayments
            - individual_inputs.previous_year_prepayment
            - company_inputs.previous_year_prepayment,
    );
    let total_net_income = round_half_up(total_gross_income - total_tax_burden);

    debug!(
        personal_taxable_income = %personal_taxable_income,
        personal_tax_due = %personal_tax_due,
        company_tax_due = %company.tax_due,
        total_tax_burden = %total_tax_burden,
        total_net_income = %total_net_income,
        "full combination calculated"
    );

    FullCombinedResult {
        individual,
        company,
        personal_taxable_income,
        personal_gross_tax,
        personal_tax_due,
        solidarity_contribution,
        personal_prepayment,
        minimum_card_spending,
        total_gross_income,
        total_taxes,
        total_prepayments,
        overall_tax_declaration,
        total_tax_burden,
        total_net_income,
    }
}

impl ScenarioOutcome for FullCombinedResult {
    fn kind(&self) -> ScenarioKind {
        ScenarioKind::Full
    }

    fn total_income(&self) -> Decimal {
        self.total_gross_income
    }

    fn total_taxes(&self) -> Decimal {
        self.total_tax_burden
    }

    fn net_income(&self) -> Decimal {
        self.total_net_income
    }

    fn prepayment(&self) -> Decimal {
        self.total_prepayments
    }

    fn tax_declaration(&self) -> Decimal {
        self.overall_tax_declaration
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::IncomeStatement;

    fn individual() -> IndividualBusinessInputs {
        IndividualBusinessInputs {
            statement: IncomeStatement {
                net_turnover: dec!(18000),
                purchases_goods_materials: dec!(-8000),
                ..Default::default()
            },
            deemed_taxation: dec!(0),
            business_withholdings: dec!(100),
            previous_year_prepayment: dec!(400),
        }
    }

    fn company() -> CompanyInputs {
        CompanyInputs {
            statement: IncomeStatement {
                net_turnover: dec!(50000),
                other_expenses_losses: dec!(-20000),
                ..Default::default()
            },
            business_withholdings: dec!(0),
            previous_year_prepayment: dec!(5000),
            professional_fee: dec!(1000),
        }
    }

    fn wages() -> EmployeeInputs {
        EmployeeInputs {
            employee_income: dec!(15000),
            tax_reductions: dec!(777),
            employee_withholdings: dec!(2500),
        }
    }

    #[test]
    fn personal_base_merges_business_and_wages() {
        let result = calculate_full_combined(&individual(), &company(), &wages());

        assert_eq!(result.personal_taxable_income, dec!(25000));
        assert_eq!(result.personal_gross_tax, dec!(4500.00));
        assert_eq!(result.personal_tax_due, dec!(3723.00));
        assert_eq!(result.solidarity_contribution, dec!(426.00));
        assert_eq!(result.minimum_card_spending, dec!(7500.00));
    }

    #[test]
    fn personal_prepayment_ignores_wages() {
        let result = calculate_full_combined(&individual(), &company(), &wages());

        // 900 * 0.55 - 100
        assert_eq!(result.personal_prepayment, dec!(395.00));
        assert_eq!(result.personal_prepayment, result.individual.prepayment_next_year);
    }

    #[test]
    fn totals_combine_both_legs() {
        let result = calculate_full_combined(&individual(), &company(), &wages());

        // Company: 30000 * 0.22 = 6600, prepayment 5280
        assert_eq!(result.company.tax_due, dec!(6600.00));
        assert_eq!(result.company.prepayment_next_year, dec!(5280.00));

        assert_eq!(result.total_gross_income, dec!(55000));
        // 3723 + 426 + 6600 + 1000
        assert_eq!(result.total_taxes, dec!(11749.00));
        // 395 + 5280
        assert_eq!(result.total_prepayments, dec!(5675.00));
        // 3723 + 395 + 2500 + 100 + (6600 + 5280 + 0 - 5000 + 1000) - 400
        assert_eq!(result.overall_tax_declaration, dec!(14198.00));
        // 11749 + 5675 - 400 - 5000
        assert_eq!(result.total_tax_burden, dec!(12024.00));
        assert_eq!(result.total_net_income, dec!(42976.00));
    }

    #[test]
    fn previous_year_prepayments_are_subtracted_once() {
        let base = calculate_full_combined(&individual(), &company(), &wages());
        let bumped = calculate_full_combined(
            &individual().with_previous_year_prepayment(dec!(1400)),
            &company().with_previous_year_prepayment(dec!(6000)),
            &wages(),
        );

        assert_eq!(base.total_tax_burden - bumped.total_tax_burden, dec!(2000));
        assert_eq!(bumped.total_net_income - base.total_net_income, dec!(2000));
    }

    #[test]
    fn outcome_net_equals_income_minus_burden() {
        let result = calculate_full_combined(&individual(), &company(), &wages());

        assert_eq!(result.kind(), ScenarioKind::Full);
        assert_eq!(result.total_income() - result.total_taxes(), result.net_income());
    }
}
