use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::IncomeStatement;

/// Inputs for one sole-proprietorship fiscal year.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndividualBusinessInputs {
    #[serde(flatten)]
    pub statement: IncomeStatement,

    /// Presumptive minimum taxable income (see [`crate::calculations::deemed_taxation`]).
    pub deemed_taxation: Decimal,
    pub business_withholdings: Decimal,
    pub previous_year_prepayment: Decimal,
}

impl IndividualBusinessInputs {
    /// Returns a copy whose previous-year prepayment is `amount`, typically
    /// the prior fiscal year's `prepayment_next_year`.
    pub fn with_previous_year_prepayment(
        mut self,
        amount: Decimal,
    ) -> Self {
        self.previous_year_prepayment = amount;
        self
    }

    /// Returns a copy with the deemed taxation replaced.
    pub fn with_deemed_taxation(
        mut self,
        amount: Decimal,
    ) -> Self {
        self.deemed_taxation = amount;
        self
    }
}

/// Inputs for one incorporated-company fiscal year.
///
/// Companies have no deemed taxation; they pay a flat professional duty fee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyInputs {
    #[serde(flatten)]
    pub statement: IncomeStatement,

    pub business_withholdings: Decimal,
    pub previous_year_prepayment: Decimal,
    pub professional_fee: Decimal,
}

impl CompanyInputs {
    /// Returns a copy whose previous-year prepayment is `amount`.
    pub fn with_previous_year_prepayment(
        mut self,
        amount: Decimal,
    ) -> Self {
        self.previous_year_prepayment = amount;
        self
    }
}

/// Wage income earned alongside a sole proprietorship.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployeeInputs {
    pub employee_income: Decimal,
    pub tax_reductions: Decimal,
    pub employee_withholdings: Decimal,
}
