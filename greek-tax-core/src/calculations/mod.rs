//! The tax formula engine.
//!
//! Leaf primitives ([`progressive_tax`], [`solidarity_contribution`],
//! [`corporate_tax`], [`deemed_taxation`]) are composed by the five scenario
//! calculators in [`scenarios`]. Every function here is pure and total over
//! [`rust_decimal::Decimal`]; each produced amount is rounded to cents at the
//! step that produces it.

pub mod brackets;
pub mod common;
pub mod corporate;
pub mod deemed;
pub mod scenarios;

pub use brackets::{
    BracketSchedule, INCOME_TAX_SCHEDULE, SOLIDARITY_SCHEDULE, progressive_tax,
    solidarity_contribution,
};
pub use common::{PercentageChange, minimum_card_spending, percentage_change, round_half_up};
pub use corporate::corporate_tax;
pub use deemed::deemed_taxation;
pub use scenarios::{
    CombinedResult, CompanyResult, EmployeeResult, FullCombinedResult, IndividualResult,
    ScenarioError, ScenarioInputs, ScenarioOutcome, ScenarioResult, StatementTotals,
    calculate_combined, calculate_company, calculate_employee_income, calculate_full_combined,
    calculate_individual_business, evaluate,
};
