use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Income-statement line items shared by every business entity.
///
/// Expense lines (purchases, employee benefits, depreciation, other expenses)
/// are entered as negative amounts, exactly as they appear on the statement,
/// so the operating result is a plain sum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeStatement {
    pub net_turnover: Decimal,
    pub other_ordinary_income: Decimal,
    pub inventory_changes: Decimal,
    pub purchases_goods_materials: Decimal,
    pub employee_benefits: Decimal,
    pub depreciation: Decimal,
    pub other_expenses_losses: Decimal,
    pub other_income_gains: Decimal,
    pub interest_net: Decimal,

    /// Tax adjustments added to the accounting result.
    pub adjustments: Decimal,

    /// Prior-year losses applied against this year's result.
    pub carried_forward_losses: Decimal,
}

impl IncomeStatement {
    /// The nine operating-statement lines, in statement order.
    pub fn operating_lines(&self) -> [Decimal; 9] {
        [
            self.net_turnover,
            self.other_ordinary_income,
            self.inventory_changes,
            self.purchases_goods_materials,
            self.employee_benefits,
            self.depreciation,
            self.other_expenses_losses,
            self.other_income_gains,
            self.interest_net,
        ]
    }
}
