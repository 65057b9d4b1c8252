pub mod amount;
mod business;
mod deemed_factors;
mod inputs;
mod scenario;
mod statement;
mod tax_bracket;

pub use amount::{InvalidAmount, amount_from_f64, parse_amount};
pub use business::{Business, FiscalYearRecord, NewBusiness};
pub use deemed_factors::DeemedTaxationFactors;
pub use inputs::{CompanyInputs, EmployeeInputs, IndividualBusinessInputs};
pub use scenario::ScenarioKind;
pub use statement::IncomeStatement;
pub use tax_bracket::TaxBracket;
