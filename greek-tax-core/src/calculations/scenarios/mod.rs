//! The five filing-scenario calculators.
//!
//! Each calculator is a free function from input records to a result record.
//! [`evaluate`] dispatches on [`ScenarioKind`] over whatever inputs a caller
//! has at hand, which is what a side-by-side comparison needs.

mod combined;
mod company;
mod employee;
mod full;
mod individual;
mod statement;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use combined::{CombinedResult, calculate_combined};
pub use company::{COMPANY_PREPAYMENT_RATE, CompanyResult, calculate_company};
pub use employee::{EmployeeResult, calculate_employee_income};
pub use full::{FullCombinedResult, calculate_full_combined};
pub use individual::{INDIVIDUAL_PREPAYMENT_RATE, IndividualResult, calculate_individual_business};
pub use statement::StatementTotals;

use crate::models::{CompanyInputs, EmployeeInputs, IndividualBusinessInputs, ScenarioKind};

/// Summary figures every scenario result can report.
///
/// `total_income() - total_taxes() == net_income()` holds for every
/// implementation.
pub trait ScenarioOutcome {
    fn kind(&self) -> ScenarioKind;
    fn total_income(&self) -> Decimal;
    fn total_taxes(&self) -> Decimal;
    fn net_income(&self) -> Decimal;
    fn prepayment(&self) -> Decimal;
    fn tax_declaration(&self) -> Decimal;
}

/// Errors from [`evaluate`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("scenario '{scenario}' needs {missing} inputs")]
    MissingInputs {
        scenario: &'static str,
        missing: &'static str,
    },
}

/// Whatever input records are available for one fiscal year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioInputs {
    pub individual: Option<IndividualBusinessInputs>,
    pub company: Option<CompanyInputs>,
    pub employee: Option<EmployeeInputs>,
}

impl ScenarioInputs {
    /// Whether every input kind `kind` needs is present.
    pub fn supports(
        &self,
        kind: ScenarioKind,
    ) -> bool {
        let (individual, company, employee) = kind.required_inputs();
        (!individual || self.individual.is_some())
            && (!company || self.company.is_some())
            && (!employee || self.employee.is_some())
    }

    /// Scenarios that can run on these inputs, in [`ScenarioKind::ALL`] order.
    pub fn available_scenarios(&self) -> Vec<ScenarioKind> {
        ScenarioKind::ALL
            .into_iter()
            .filter(|kind| self.supports(*kind))
            .collect()
    }

    fn individual_for(
        &self,
        kind: ScenarioKind,
    ) -> Result<&IndividualBusinessInputs, ScenarioError> {
        self.individual.as_ref().ok_or(ScenarioError::MissingInputs {
            scenario: kind.as_str(),
            missing: "individual business",
        })
    }

    fn company_for(
        &self,
        kind: ScenarioKind,
    ) -> Result<&CompanyInputs, ScenarioError> {
        self.company.as_ref().ok_or(ScenarioError::MissingInputs {
            scenario: kind.as_str(),
            missing: "company",
        })
    }

    fn employee_for(
        &self,
        kind: ScenarioKind,
    ) -> Result<&EmployeeInputs, ScenarioError> {
        self.employee.as_ref().ok_or(ScenarioError::MissingInputs {
            scenario: kind.as_str(),
            missing: "employee",
        })
    }
}

/// Result of any scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scenario", rename_all = "snake_case")]
pub enum ScenarioResult {
    Individual(IndividualResult),
    Company(CompanyResult),
    Employee(EmployeeResult),
    IndividualCompany(CombinedResult),
    Full(FullCombinedResult),
}

impl ScenarioResult {
    fn outcome(&self) -> &dyn ScenarioOutcome {
        match self {
            Self::Individual(r) => r,
            Self::Company(r) => r,
            Self::Employee(r) => r,
            Self::IndividualCompany(r) => r,
            Self::Full(r) => r,
        }
    }
}

impl ScenarioOutcome for ScenarioResult {
    fn kind(&self) -> ScenarioKind {
        self.outcome().kind()
    }

    fn total_income(&self) -> Decimal {
        self.outcome().total_income()
    }

    fn total_taxes(&self) -> Decimal {
        self.outcome().total_taxes()
    }

    fn net_income(&self) -> Decimal {
        self.outcome().net_income()
    }

    fn prepayment(&self) -> Decimal {
        self.outcome().prepayment()
    }

    fn tax_declaration(&self) -> Decimal {
        self.outcome().tax_declaration()
    }
}

/// Runs scenario `kind` over `inputs`.
///
/// # Errors
///
/// [`ScenarioError::MissingInputs`] when an input kind the scenario needs is
/// absent.
pub fn evaluate(
    kind: ScenarioKind,
    inputs: &ScenarioInputs,
) -> Result<ScenarioResult, ScenarioError> {
    let result = match kind {
        ScenarioKind::Individual => {
            ScenarioResult::Individual(calculate_individual_business(inputs.individual_for(kind)?))
        }
        ScenarioKind::Company => ScenarioResult::Company(calculate_company(inputs.company_for(kind)?)),
        ScenarioKind::Employee => ScenarioResult::Employee(calculate_employee_income(
            inputs.individual_for(kind)?,
            inputs.employee_for(kind)?,
        )),
        ScenarioKind::IndividualCompany => ScenarioResult::IndividualCompany(calculate_combined(
            inputs.individual_for(kind)?,
            inputs.company_for(kind)?,
        )),
        ScenarioKind::Full => ScenarioResult::Full(calculate_full_combined(
            inputs.individual_for(kind)?,
            inputs.company_for(kind)?,
            inputs.employee_for(kind)?,
        )),
    };
    Ok(result)
}
