use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One band of a marginal rate table.
///
/// `base_tax` is the tax accumulated by every band below `min_income`, so the
/// tax for an income inside this band is `base_tax + (income - min_income) * tax_rate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
    pub base_tax: Decimal,
}

impl TaxBracket {
    /// Whether `income` falls in `(min_income, max_income]`.
    pub fn contains(
        &self,
        income: Decimal,
    ) -> bool {
        income > self.min_income && self.max_income.is_none_or(|max| income <= max)
    }
}
