//! Plain-text reports.
//!
//! Amounts are printed the Greek way (`1.234,56 €`). Engine output is already
//! rounded to cents and is never rounded again here.

use std::fmt::Write;

use greek_tax_core::ScenarioKind;
use greek_tax_core::calculations::{
    PercentageChange, ScenarioOutcome, ScenarioResult, percentage_change,
};
use rust_decimal::Decimal;

const AMOUNT_WIDTH: usize = 16;
const CHANGE_WIDTH: usize = 10;

/// Groups the integer digits by thousands with `.` and uses `,` for decimals.
fn greek_number(value: Decimal) -> String {
    let text = format!("{:.2}", value);
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("{sign}{grouped},{frac_part}")
}

/// `1234.5` → `1.234,50 €`.
pub fn format_amount(value: Decimal) -> String {
    format!("{} €", greek_number(value))
}

/// `12.34` → `12,34%`; an undefined change prints as `-`.
pub fn format_percentage(change: PercentageChange) -> String {
    match change {
        PercentageChange::Undefined => "-".to_string(),
        PercentageChange::Value(value) => format!("{}%", greek_number(value)),
    }
}

/// Labelled figures of a result, in reading order.
pub fn report_lines(result: &ScenarioResult) -> Vec<(&'static str, Decimal)> {
    match result {
        ScenarioResult::Individual(r) => vec![
            ("Result before tax", r.result_before_tax),
            ("Adjusted results", r.adjusted_results),
            ("Taxable results", r.taxable_results),
            ("Taxable income", r.taxable_income),
            ("Income tax due", r.tax_due),
            ("Prepayment for next year", r.prepayment_next_year),
            ("Tax declaration total", r.total_tax_declaration),
            ("Minimum card spending", r.minimum_card_spending),
            ("Total income", r.total_income),
            ("Total taxes", r.total_taxes),
            ("Net income", r.net_income),
        ],
        ScenarioResult::Company(r) => vec![
            ("Result before tax", r.result_before_tax),
            ("Adjusted results", r.adjusted_results),
            ("Taxable results", r.taxable_results),
            ("Corporate tax due", r.tax_due),
            ("Prepayment for next year", r.prepayment_next_year),
            ("Tax declaration total", r.total_tax_declaration),
            ("Total income", r.total_income),
            ("Total taxes", r.total_taxes),
            ("Net income", r.net_income),
        ],
        ScenarioResult::Employee(r) => vec![
            ("Result before tax", r.result_before_tax),
            ("Adjusted results", r.adjusted_results),
            ("Taxable results", r.taxable_results),
            ("Employee income", r.employee_income),
            ("Total taxable income", r.total_taxable_income),
            ("Income tax", r.total_income_tax),
            ("Tax reductions", r.tax_reductions),
            ("Net tax due", r.net_tax_due),
            ("Tax on business income", r.business_tax_only),
            ("Prepayment for next year", r.prepayment_next_year),
            ("Employee withholdings", r.employee_withholdings),
            ("Business withholdings", r.business_withholdings),
            ("Previous year prepayment", r.previous_year_prepayment),
            ("Tax declaration total", r.total_tax_declaration),
            ("Solidarity contribution", r.solidarity_contribution),
            ("Minimum card spending", r.minimum_card_spending),
            ("Total income", r.total_income),
            ("Total taxes", r.total_taxes),
            ("Net income", r.net_income),
        ],
        ScenarioResult::IndividualCompany(r) => vec![
            ("Individual taxable income", r.individual.taxable_income),
            ("Individual tax due", r.individual.tax_due),
            ("Individual prepayment", r.individual.prepayment_next_year),
            ("Company taxable results", r.company.taxable_results),
            ("Company tax due", r.company.tax_due),
            ("Company prepayment", r.company.prepayment_next_year),
            ("Total income", r.total_income),
            ("Total taxes", r.total_taxes),
            ("Total prepayment", r.total_prepayment),
            ("Overall tax declaration", r.overall_tax_declaration),
            ("Net income", r.total_net_income),
        ],
        ScenarioResult::Full(r) => vec![
            ("Individual taxable income", r.individual.taxable_income),
            ("Company taxable results", r.company.taxable_results),
            ("Company tax due", r.company.tax_due),
            ("Personal taxable income", r.personal_taxable_income),
            ("Personal gross tax", r.personal_gross_tax),
            ("Personal tax due", r.personal_tax_due),
            ("Solidarity contribution", r.solidarity_contribution),
            ("Personal prepayment", r.personal_prepayment),
            ("Minimum card spending", r.minimum_card_spending),
            ("Total gross income", r.total_gross_income),
            ("Total taxes", r.total_taxes),
            ("Total prepayments", r.total_prepayments),
            ("Overall tax declaration", r.overall_tax_declaration),
            ("Total tax burden", r.total_tax_burden),
            ("Net income", r.total_net_income),
        ],
    }
}

fn label_width(lines: &[(&'static str, Decimal)]) -> usize {
    lines
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0)
}

/// One scenario's figures, with a previous-year column and the change
/// between the two when `previous` is given.
pub fn render_result(
    heading: &str,
    current: &ScenarioResult,
    previous: Option<&ScenarioResult>,
) -> String {
    let lines = report_lines(current);
    let previous_lines = previous.map(report_lines);
    let width = label_width(&lines);
    let mut out = String::new();

    let _ = writeln!(out, "{heading}");
    let _ = writeln!(out, "{}", current.kind().title());
    match &previous_lines {
        Some(_) => {
            let _ = writeln!(
                out,
                "{:<width$}  {:>AMOUNT_WIDTH$}  {:>AMOUNT_WIDTH$}  {:>CHANGE_WIDTH$}",
                "", "Current", "Previous", "Change"
            );
        }
        None => {
            let _ = writeln!(out, "{:<width$}  {:>AMOUNT_WIDTH$}", "", "Current");
        }
    }

    for (i, (label, value)) in lines.iter().enumerate() {
        let prior = previous_lines
            .as_ref()
            .and_then(|prior| prior.get(i))
            .filter(|(prior_label, _)| prior_label == label)
            .map(|(_, prior_value)| *prior_value);

        match (&previous_lines, prior) {
            (Some(_), Some(prior)) => {
                let _ = writeln!(
                    out,
                    "{:<width$}  {:>AMOUNT_WIDTH$}  {:>AMOUNT_WIDTH$}  {:>CHANGE_WIDTH$}",
                    label,
                    format_amount(*value),
                    format_amount(prior),
                    format_percentage(percentage_change(*value, prior)),
                );
            }
            (Some(_), None) => {
                let _ = writeln!(
                    out,
                    "{:<width$}  {:>AMOUNT_WIDTH$}  {:>AMOUNT_WIDTH$}  {:>CHANGE_WIDTH$}",
                    label,
                    format_amount(*value),
                    "",
                    "-",
                );
            }
            (None, _) => {
                let _ = writeln!(out, "{:<width$}  {:>AMOUNT_WIDTH$}", label, format_amount(*value));
            }
        }
    }

    out
}

/// Side-by-side summary of several scenarios.
///
/// The scenario with the highest net income is named at the bottom; ties go
/// to the one listed first.
pub fn render_comparison(
    heading: &str,
    results: &[ScenarioResult],
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{heading}");

    if results.is_empty() {
        let _ = writeln!(out, "No scenario has the inputs it needs.");
        return out;
    }

    let width = results
        .iter()
        .map(|r| r.kind().title().chars().count())
        .max()
        .unwrap_or(0)
        .max("Scenario".len());

    let _ = writeln!(
        out,
        "{:<width$}  {:>AMOUNT_WIDTH$}  {:>AMOUNT_WIDTH$}  {:>AMOUNT_WIDTH$}  {:>AMOUNT_WIDTH$}  {:>AMOUNT_WIDTH$}",
        "Scenario", "Total income", "Total taxes", "Net income", "Prepayment", "Declaration"
    );
    for result in results {
        let _ = writeln!(
            out,
            "{:<width$}  {:>AMOUNT_WIDTH$}  {:>AMOUNT_WIDTH$}  {:>AMOUNT_WIDTH$}  {:>AMOUNT_WIDTH$}  {:>AMOUNT_WIDTH$}",
            result.kind().title(),
            format_amount(result.total_income()),
            format_amount(result.total_taxes()),
            format_amount(result.net_income()),
            format_amount(result.prepayment()),
            format_amount(result.tax_declaration()),
        );
    }

    if let Some(best) = best_net_income(results) {
        let _ = writeln!(out);
        let _ = writeln!(out, "Highest net income: {}", best.title());
    }

    out
}

/// The scenario with the highest net income, first one on ties.
pub fn best_net_income(results: &[ScenarioResult]) -> Option<ScenarioKind> {
    results
        .iter()
        .fold(None::<&ScenarioResult>, |best, r| match best {
            Some(b) if b.net_income() >= r.net_income() => Some(b),
            _ => Some(r),
        })
        .map(|r| r.kind())
}

#[cfg(test)]
mod tests {
    use greek_tax_core::calculations::{calculate_company, calculate_individual_business};
    use greek_tax_core::{CompanyInputs, IncomeStatement, IndividualBusinessInputs};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn individual(turnover: Decimal) -> ScenarioResult {
        ScenarioResult::Individual(calculate_individual_business(&IndividualBusinessInputs {
            statement: IncomeStatement {
                net_turnover: turnover,
                ..Default::default()
            },
            ..Default::default()
        }))
    }

    fn company(turnover: Decimal) -> ScenarioResult {
        ScenarioResult::Company(calculate_company(&CompanyInputs {
            statement: IncomeStatement {
                net_turnover: turnover,
                ..Default::default()
            },
            ..Default::default()
        }))
    }

    #[test]
    fn amounts_use_greek_separators() {
        assert_eq!(format_amount(dec!(1234.56)), "1.234,56 €");
        assert_eq!(format_amount(dec!(1234567.8)), "1.234.567,80 €");
        assert_eq!(format_amount(dec!(0)), "0,00 €");
        assert_eq!(format_amount(dec!(999)), "999,00 €");
        assert_eq!(format_amount(dec!(-2975.33)), "-2.975,33 €");
        assert_eq!(format_amount(dec!(100000)), "100.000,00 €");
    }

    #[test]
    fn percentages_use_decimal_comma() {
        assert_eq!(format_percentage(PercentageChange::Value(dec!(12.34))), "12,34%");
        assert_eq!(format_percentage(PercentageChange::Value(dec!(-5.5))), "-5,50%");
        assert_eq!(format_percentage(PercentageChange::Value(dec!(1500))), "1.500,00%");
        assert_eq!(format_percentage(PercentageChange::Undefined), "-");
    }

    #[test]
    fn result_without_previous_has_single_column() {
        let report = render_result("Business b-1, 2025", &individual(dec!(10000)), None);

        assert!(report.starts_with("Business b-1, 2025\nIndividual business\n"));
        assert!(report.contains("Income tax due"));
        assert!(report.contains("900,00 €"));
        assert!(!report.contains("Previous"));
    }

    #[test]
    fn result_with_previous_shows_change() {
        let report = render_result(
            "Business b-1, 2025",
            &individual(dec!(11000)),
            Some(&individual(dec!(10000))),
        );

        let taxable = report
            .lines()
            .find(|line| line.starts_with("Taxable income"))
            .expect("taxable income line");
        assert!(taxable.contains("11.000,00 €"), "{taxable}");
        assert!(taxable.contains("10.000,00 €"), "{taxable}");
        assert!(taxable.ends_with("10,00%"), "{taxable}");
    }

    #[test]
    fn every_kind_has_lines_ending_with_net_income() {
        for result in [individual(dec!(1)), company(dec!(1))] {
            let lines = report_lines(&result);
            assert_eq!(lines.last().map(|(label, _)| *label), Some("Net income"));
            assert_eq!(lines.last().map(|(_, v)| *v), Some(result.net_income()));
        }
    }

    #[test]
    fn comparison_names_best_scenario() {
        // Same 50 000 base: 22% flat beats the progressive table.
        let results = vec![individual(dec!(50000)), company(dec!(50000))];

        let table = render_comparison("Business b-1, 2025", &results);

        assert!(table.contains("Individual business"));
        assert!(table.contains("Company"));
        assert!(table.ends_with("Highest net income: Company\n"));
        assert_eq!(best_net_income(&results), Some(ScenarioKind::Company));
    }

    #[test]
    fn comparison_ties_go_to_first() {
        let results = vec![individual(dec!(0)), company(dec!(0))];

        assert_eq!(best_net_income(&results), Some(ScenarioKind::Individual));
        assert_eq!(best_net_income(&[]), None);
    }

    #[test]
    fn empty_comparison_says_so() {
        let table = render_comparison("Business b-1, 2025", &[]);

        assert!(table.contains("No scenario has the inputs it needs."));
    }
}
