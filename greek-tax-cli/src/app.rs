//! Subcommand bodies. Each returns the text to print on stdout.

use std::fmt::Write;

use anyhow::{Context, Result, bail};
use chrono::Local;
use greek_tax_core::calculations::{
    ScenarioInputs, ScenarioResult, calculate_company, calculate_individual_business, evaluate,
};
use greek_tax_core::db::{DbConfig, RepositoryRegistry};
use greek_tax_core::{Business, NewBusiness, OptionalRecord, ScenarioKind, TaxRepository};
use greek_tax_db_sqlite::SqliteRepositoryFactory;
use tracing::{debug, info};

use crate::input_file::InputFile;
use crate::report::{render_comparison, render_result};
use crate::utils::{new_business_id, validate_tax_id};

pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

pub async fn open_repository(config: &DbConfig) -> Result<Box<dyn TaxRepository>> {
    build_registry().create(config).await.with_context(|| {
        format!(
            "cannot open {} database '{}'",
            config.backend, config.connection_string
        )
    })
}

/// Runs one scenario, or every scenario the file has inputs for, without
/// touching storage.
pub fn calculate(
    file: &InputFile,
    scenario: Option<ScenarioKind>,
) -> Result<String> {
    let inputs = file.scenario_inputs();

    if let Some(kind) = scenario {
        let result = evaluate(kind, &inputs)?;
        return Ok(render_result("Inputs file", &result, None));
    }

    let kinds = inputs.available_scenarios();
    if kinds.is_empty() {
        bail!("inputs file has no [individual], [company] or [employee] section");
    }

    let results = evaluate_all(&inputs, &kinds)?;
    let mut out = results
        .iter()
        .map(|result| render_result("Inputs file", result, None))
        .collect::<Vec<_>>()
        .join("\n");
    if results.len() > 1 {
        out.push('\n');
        out.push_str(&render_comparison("Comparison", &results));
    }
    Ok(out)
}

fn evaluate_all(
    inputs: &ScenarioInputs,
    kinds: &[ScenarioKind],
) -> Result<Vec<ScenarioResult>> {
    kinds
        .iter()
        .map(|kind| evaluate(*kind, inputs).map_err(anyhow::Error::from))
        .collect()
}

pub async fn add_business(
    repo: &dyn TaxRepository,
    id: Option<String>,
    business_name: &str,
    activity: &str,
    address: &str,
    tax_id: &str,
) -> Result<Business> {
    let tax_id = validate_tax_id(tax_id)?;
    let business_name = business_name.trim();
    if business_name.is_empty() {
        bail!("business name must not be empty");
    }

    let business = repo
        .create_business(NewBusiness {
            id: id.unwrap_or_else(new_business_id),
            business_name: business_name.to_string(),
            activity: activity.trim().to_string(),
            address: address.trim().to_string(),
            tax_id,
        })
        .await
        .context("cannot create business")?;
    Ok(business)
}

pub async fn list_businesses(repo: &dyn TaxRepository) -> Result<String> {
    let businesses = repo.list_businesses().await?;
    if businesses.is_empty() {
        return Ok("No businesses.\n".to_string());
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<36}  {:<9}  {:<16}  Name",
        "Id", "Tax id", "Last calculation"
    );
    for business in &businesses {
        let last = business
            .last_calculation_at
            .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "{:<36}  {:<9}  {:<16}  {}",
            business.id, business.tax_id, last, business.business_name
        );
    }
    Ok(out)
}

pub async fn delete_business(
    repo: &dyn TaxRepository,
    id: &str,
) -> Result<String> {
    repo.delete_business(id)
        .await
        .with_context(|| format!("cannot delete business '{id}'"))?;
    Ok(format!("Deleted business {id}\n"))
}

/// Upserts every input kind the file holds for `(business_id, fiscal_year)`.
pub async fn save_inputs(
    repo: &dyn TaxRepository,
    business_id: &str,
    fiscal_year: i32,
    file: &InputFile,
) -> Result<String> {
    let business = get_business(repo, business_id).await?;
    let mut saved = Vec::new();

    if let Some(inputs) = &file.individual {
        repo.upsert_individual_inputs(&business.id, fiscal_year, inputs)
            .await?;
        saved.push("individual");
    }
    if let Some(inputs) = &file.company {
        repo.upsert_company_inputs(&business.id, fiscal_year, inputs)
            .await?;
        saved.push("company");
    }
    if let Some(inputs) = &file.employee {
        repo.upsert_employee_inputs(&business.id, fiscal_year, inputs)
            .await?;
        saved.push("employee");
    }

    if saved.is_empty() {
        bail!("inputs file has no [individual], [company] or [employee] section");
    }

    repo.touch_business(&business.id).await?;
    info!(business_id = %business.id, fiscal_year, kinds = ?saved, "inputs saved");

    Ok(format!(
        "Saved {} inputs for {}, fiscal year {}\n",
        saved.join(", "),
        business.business_name,
        fiscal_year
    ))
}

async fn get_business(
    repo: &dyn TaxRepository,
    business_id: &str,
) -> Result<Business> {
    repo.get_business(business_id)
        .await
        .with_context(|| format!("business '{business_id}'"))
}

/// Stored inputs of every kind for one fiscal year.
///
/// With `carry_prepayment`, individual and company inputs take their
/// `previous_year_prepayment` from the prior year's computed
/// `prepayment_next_year` when a prior-year record of the same kind exists.
pub async fn stored_inputs(
    repo: &dyn TaxRepository,
    business_id: &str,
    fiscal_year: i32,
    carry_prepayment: bool,
) -> Result<ScenarioInputs> {
    let mut individual = repo
        .get_individual_inputs(business_id, fiscal_year)
        .await
        .optional()?
        .map(|record| record.inputs);
    let mut company = repo
        .get_company_inputs(business_id, fiscal_year)
        .await
        .optional()?
        .map(|record| record.inputs);
    let employee = repo
        .get_employee_inputs(business_id, fiscal_year)
        .await
        .optional()?
        .map(|record| record.inputs);

    let carry_from = fiscal_year.checked_sub(1).filter(|_| carry_prepayment);
    if let Some(prior_year) = carry_from {
        if let Some(current) = individual.take() {
            let prior = repo
                .get_individual_inputs(business_id, prior_year)
                .await
                .optional()?;
            individual = Some(match prior {
                Some(prior) => {
                    let carried = calculate_individual_business(&prior.inputs).prepayment_next_year;
                    debug!(business_id, prior_year, %carried, "individual prepayment carried");
                    current.with_previous_year_prepayment(carried)
                }
                None => current,
            });
        }

        if let Some(current) = company.take() {
            let prior = repo
                .get_company_inputs(business_id, prior_year)
                .await
                .optional()?;
            company = Some(match prior {
                Some(prior) => {
                    let carried = calculate_company(&prior.inputs).prepayment_next_year;
                    debug!(business_id, prior_year, %carried, "company prepayment carried");
                    current.with_previous_year_prepayment(carried)
                }
                None => current,
            });
        }
    }

    Ok(ScenarioInputs {
        individual,
        company,
        employee,
    })
}

fn heading(
    business: &Business,
    fiscal_year: i32,
) -> String {
    format!(
        "{} ({}), fiscal year {}",
        business.business_name, business.tax_id, fiscal_year
    )
}

/// Recomputes one scenario from stored inputs, next to the prior year's
/// figures when that year has the inputs the scenario needs.
pub async fn show(
    repo: &dyn TaxRepository,
    business_id: &str,
    fiscal_year: i32,
    kind: ScenarioKind,
    carry_prepayment: bool,
) -> Result<String> {
    let business = get_business(repo, business_id).await?;

    let inputs = stored_inputs(repo, &business.id, fiscal_year, carry_prepayment).await?;
    let current = evaluate(kind, &inputs)
        .with_context(|| format!("no stored inputs for fiscal year {fiscal_year}"))?;

    let previous = match fiscal_year.checked_sub(1) {
        Some(prior_year) => {
            let prior_inputs =
                stored_inputs(repo, &business.id, prior_year, carry_prepayment).await?;
            if prior_inputs.supports(kind) {
                Some(evaluate(kind, &prior_inputs)?)
            } else {
                None
            }
        }
        None => None,
    };

    repo.touch_business(&business.id).await?;

    Ok(render_result(
        &heading(&business, fiscal_year),
        &current,
        previous.as_ref(),
    ))
}

/// Summary row for every scenario the stored inputs allow.
pub async fn compare(
    repo: &dyn TaxRepository,
    business_id: &str,
    fiscal_year: i32,
    carry_prepayment: bool,
) -> Result<String> {
    let business = get_business(repo, business_id).await?;

    let inputs = stored_inputs(repo, &business.id, fiscal_year, carry_prepayment).await?;
    let results = evaluate_all(&inputs, &inputs.available_scenarios())?;
    if !results.is_empty() {
        repo.touch_business(&business.id).await?;
    }

    Ok(render_comparison(&heading(&business, fiscal_year), &results))
}

#[cfg(test)]
mod tests {
    use greek_tax_core::{CompanyInputs, IncomeStatement, IndividualBusinessInputs};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;

    async fn memory_repo() -> Box<dyn TaxRepository> {
        open_repository(&DbConfig::default())
            .await
            .expect("in-memory database")
    }

    fn individual(turnover: Decimal) -> IndividualBusinessInputs {
        IndividualBusinessInputs {
            statement: IncomeStatement {
                net_turnover: turnover,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn registry_knows_sqlite() {
        assert_eq!(build_registry().available_backends(), vec!["sqlite"]);
    }

    #[tokio::test]
    async fn unknown_backend_is_reported() {
        let config = DbConfig {
            backend: "postgres".to_string(),
            connection_string: "postgres://localhost".to_string(),
        };

        let err = open_repository(&config).await.err().expect("should fail");

        assert!(format!("{err:#}").contains("unknown backend 'postgres'"));
    }

    #[test]
    fn calculate_single_scenario() {
        let file = InputFile {
            individual: Some(individual(dec!(10000))),
            ..Default::default()
        };

        let out = calculate(&file, Some(ScenarioKind::Individual)).expect("calculates");

        assert!(out.contains("Individual business"));
        assert!(out.contains("900,00 €"));
    }

    #[test]
    fn calculate_missing_inputs_for_scenario() {
        let file = InputFile {
            individual: Some(individual(dec!(10000))),
            ..Default::default()
        };

        let err = calculate(&file, Some(ScenarioKind::Company)).expect_err("needs company");

        assert_eq!(err.to_string(), "scenario 'company' needs company inputs");
    }

    #[test]
    fn calculate_all_appends_comparison() {
        let file = InputFile {
            individual: Some(individual(dec!(30000))),
            company: Some(CompanyInputs {
                statement: IncomeStatement {
                    net_turnover: dec!(30000),
                    ..Default::default()
                },
                ..Default::default()
            }),
            ..Default::default()
        };

        let out = calculate(&file, None).expect("calculates");

        assert!(out.contains("Individual business + company"));
        assert!(out.contains("Highest net income:"));
    }

    #[test]
    fn calculate_empty_file_fails() {
        assert!(calculate(&InputFile::default(), None).is_err());
    }

    #[tokio::test]
    async fn add_business_validates_tax_id() {
        let repo = memory_repo().await;

        let err = add_business(repo.as_ref(), None, "Shop", "", "", "12345")
            .await
            .expect_err("short tax id");
        assert!(err.to_string().contains("exactly 9 digits"));

        let business = add_business(
            repo.as_ref(),
            Some("b-1".to_string()),
            " ΠΑΠΑΔΟΠΟΥΛΟΣ ",
            "Retail",
            "Athens",
            "123456789",
        )
        .await
        .expect("created");
        assert_eq!(business.business_name, "ΠΑΠΑΔΟΠΟΥΛΟΣ");

        let listing = list_businesses(repo.as_ref()).await.expect("lists");
        assert!(listing.contains("b-1"));
        assert!(listing.contains("ΠΑΠΑΔΟΠΟΥΛΟΣ"));
    }

    #[tokio::test]
    async fn empty_listing() {
        let repo = memory_repo().await;

        assert_eq!(list_businesses(repo.as_ref()).await.unwrap(), "No businesses.\n");
    }

    #[tokio::test]
    async fn save_requires_existing_business() {
        let repo = memory_repo().await;
        let file = InputFile {
            individual: Some(individual(dec!(1))),
            ..Default::default()
        };

        let err = save_inputs(repo.as_ref(), "ghost", 2025, &file)
            .await
            .expect_err("no such business");

        assert!(format!("{err:#}").contains("business 'ghost'"));
    }

    #[tokio::test]
    async fn carry_uses_prior_year_prepayment() {
        let repo = memory_repo().await;
        add_business(repo.as_ref(), Some("b-1".to_string()), "Shop", "", "", "123456789")
            .await
            .unwrap();

        repo.upsert_individual_inputs("b-1", 2024, &individual(dec!(10000)))
            .await
            .unwrap();
        repo.upsert_individual_inputs(
            "b-1",
            2025,
            &individual(dec!(12000)).with_previous_year_prepayment(dec!(1)),
        )
        .await
        .unwrap();

        let plain = stored_inputs(repo.as_ref(), "b-1", 2025, false).await.unwrap();
        let carried = stored_inputs(repo.as_ref(), "b-1", 2025, true).await.unwrap();

        assert_eq!(
            plain.individual.map(|i| i.previous_year_prepayment),
            Some(dec!(1))
        );
        // 2024 tax 900, prepayment 55%
        assert_eq!(
            carried.individual.map(|i| i.previous_year_prepayment),
            Some(dec!(495.00))
        );
    }

    #[tokio::test]
    async fn carry_without_prior_year_keeps_stored_value() {
        let repo = memory_repo().await;
        add_business(repo.as_ref(), Some("b-1".to_string()), "Shop", "", "", "123456789")
            .await
            .unwrap();
        repo.upsert_individual_inputs(
            "b-1",
            2025,
            &individual(dec!(12000)).with_previous_year_prepayment(dec!(7)),
        )
        .await
        .unwrap();

        let carried = stored_inputs(repo.as_ref(), "b-1", 2025, true).await.unwrap();

        assert_eq!(
            carried.individual.map(|i| i.previous_year_prepayment),
            Some(dec!(7))
        );
    }

    #[tokio::test]
    async fn show_touches_business_and_compares_years() {
        let repo = memory_repo().await;
        add_business(repo.as_ref(), Some("b-1".to_string()), "Shop", "", "", "123456789")
            .await
            .unwrap();
        repo.upsert_individual_inputs("b-1", 2024, &individual(dec!(10000)))
            .await
            .unwrap();
        repo.upsert_individual_inputs("b-1", 2025, &individual(dec!(11000)))
            .await
            .unwrap();

        let out = show(repo.as_ref(), "b-1", 2025, ScenarioKind::Individual, false)
            .await
            .expect("shows");

        assert!(out.starts_with("Shop (123456789), fiscal year 2025\n"));
        assert!(out.contains("Previous"));
        assert!(out.contains("10,00%"));
        assert!(repo.get_business("b-1").await.unwrap().last_calculation_at.is_some());
    }

    #[tokio::test]
    async fn earliest_representable_year_has_no_prior_year() {
        let repo = memory_repo().await;
        add_business(repo.as_ref(), Some("b-1".to_string()), "Shop", "", "", "123456789")
            .await
            .unwrap();
        repo.upsert_individual_inputs(
            "b-1",
            i32::MIN,
            &individual(dec!(10000)).with_previous_year_prepayment(dec!(7)),
        )
        .await
        .unwrap();

        let carried = stored_inputs(repo.as_ref(), "b-1", i32::MIN, true).await.unwrap();
        assert_eq!(
            carried.individual.map(|i| i.previous_year_prepayment),
            Some(dec!(7))
        );

        let out = show(repo.as_ref(), "b-1", i32::MIN, ScenarioKind::Individual, true)
            .await
            .expect("shows");
        assert!(!out.contains("Previous"));
    }

    #[tokio::test]
    async fn show_without_inputs_fails() {
        let repo = memory_repo().await;
        add_business(repo.as_ref(), Some("b-1".to_string()), "Shop", "", "", "123456789")
            .await
            .unwrap();

        let err = show(repo.as_ref(), "b-1", 2025, ScenarioKind::Company, false)
            .await
            .expect_err("nothing stored");

        assert!(format!("{err:#}").contains("no stored inputs for fiscal year 2025"));
    }
}
