use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{
    CompanyResult, IndividualResult, ScenarioOutcome, calculate_company,
    calculate_individual_business,
};
use crate::calculations::common::round_half_up;
use crate::models::{CompanyInputs, IndividualBusinessInputs, ScenarioKind};

/// A sole proprietorship and a company owned side by side.
///
/// The two legs never interact; the totals are plain sums.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinedResult {
    pub individual: IndividualResult,
    pub company: CompanyResult,

    /// Individual taxable income plus company taxable results.
    pub total_income: Decimal,
    pub total_taxes: Decimal,
    pub total_net_income: Decimal,
    pub total_prepayment: Decimal,
    pub overall_tax_declaration: Decimal,
}

pub fn calculate_combined(
    individual: &IndividualBusinessInputs,
    company: &CompanyInputs,
) -> CombinedResult {
    let individual = calculate_individual_business(individual);
    let company = calculate_company(company);

    let total_income = round_half_up(individual.taxable_income + company.taxable_results);
    let total_taxes = round_half_up(individual.total_taxes + company.total_taxes);
    let total_net_income = round_half_up(individual.net_income + company.net_income);
    let total_prepayment =
        round_half_up(individual.prepayment_next_year + company.prepayment_next_year);
    let overall_tax_declaration =
        round_half_up(individual.total_tax_declaration + company.total_tax_declaration);

    debug!(
        total_income = %total_income,
        total_taxes = %total_taxes,
        total_net_income = %total_net_income,
        "individual and company calculated"
    );

    CombinedResult {
        individual,
        company,
        total_income,
        total_taxes,
        total_net_income,
        total_prepayment,
        overall_tax_declaration,
    }
}

impl ScenarioOutcome for CombinedResult {
    fn kind(&self) -> ScenarioKind {
        ScenarioKind::IndividualCompany
    }

    fn total_income(&self) -> Decimal {
        self.total_income
    }

    fn total_taxes(&self) -> Decimal {
        self.total_taxes
    }

    fn net_income(&self) -> Decimal {
        self.total_net_income
    }

    fn prepayment(&self) -> Decimal {
        self.total_prepayment
    }

    fn tax_declaration(&self) -> Decimal {
        self.overall_tax_declaration
    }
}
