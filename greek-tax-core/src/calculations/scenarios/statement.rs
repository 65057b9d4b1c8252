use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::round_half_up;
use crate::models::IncomeStatement;

/// The three aggregation lines every scenario starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementTotals {
    /// Sum of the nine operating-statement lines.
    pub result_before_tax: Decimal,
    /// `result_before_tax + adjustments`.
    pub adjusted_results: Decimal,
    /// `adjusted_results + carried_forward_losses`.
    pub taxable_results: Decimal,
}

impl StatementTotals {
    pub fn from_statement(statement: &IncomeStatement) -> Self {
        let result_before_tax = round_half_up(statement.operating_lines().into_iter().sum());
        let adjusted_results = round_half_up(result_before_tax + statement.adjustments);
        let taxable_results = round_half_up(adjusted_results + statement.carried_forward_losses);

        Self {
            result_before_tax,
            adjusted_results,
            taxable_results,
        }
    }
}
