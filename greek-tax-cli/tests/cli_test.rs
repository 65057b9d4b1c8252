use std::path::PathBuf;

use greek_tax_cli::app;
use greek_tax_cli::input_file::InputFile;
use greek_tax_core::db::DbConfig;
use greek_tax_core::{ScenarioKind, TaxRepository};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn load(name: &str) -> InputFile {
    InputFile::load(&fixture(name)).expect("fixture parses")
}

async fn repo_with_sample_business() -> Box<dyn TaxRepository> {
    let repo = app::open_repository(&DbConfig::default())
        .await
        .expect("in-memory database");
    app::add_business(
        repo.as_ref(),
        Some("papadopoulos".to_string()),
        "ΠΑΠΑΔΟΠΟΥΛΟΣ ΓΕΩΡΓΙΟΣ",
        "ΕΜΠΟΡΙΟ Η/Υ",
        "ΣΟΦΟΚΛΕΟΥΣ 12 ΑΘΗΝΑ",
        "134467717",
    )
    .await
    .expect("business created");
    repo
}

#[test]
fn calculate_runs_every_scenario_in_file() {
    let out = app::calculate(&load("all_scenarios.toml"), None).expect("calculates");

    for kind in ScenarioKind::ALL {
        assert!(out.contains(kind.title()), "missing {kind:?}");
    }
    // Company tax on 30 000 at 22%
    assert!(out.contains("6.600,00 €"));
    // Business taxable income 16 397.92 plus wages 15 000
    assert!(out.contains("31.397,92 €"));
    assert!(out.contains("Highest net income:"));
}

#[test]
fn calculate_single_scenario_from_file() {
    let out = app::calculate(&load("sample_2025.toml"), Some(ScenarioKind::Individual))
        .expect("calculates");

    assert!(out.contains("-2.975,33 €"));
    assert!(out.contains("16.397,92 €"));
    assert!(out.contains("2.307,54 €"));
    assert!(out.contains("1.269,15 €"));
    assert!(!out.contains("Comparison"));
}

#[test]
fn deemed_section_sets_taxable_floor() {
    let file = load("deemed.toml");

    assert_eq!(
        file.individual.as_ref().map(|i| i.deemed_taxation),
        Some(dec!(4000))
    );
    let out = app::calculate(&file, Some(ScenarioKind::Individual)).expect("calculates");
    // 4 000 deemed at 9%
    assert!(out.contains("360,00 €"));
}

#[tokio::test]
async fn stored_years_are_shown_with_previous_column() {
    let repo = repo_with_sample_business().await;
    app::save_inputs(repo.as_ref(), "papadopoulos", 2024, &load("sample_2024.toml"))
        .await
        .expect("2024 saved");
    let message = app::save_inputs(repo.as_ref(), "papadopoulos", 2025, &load("sample_2025.toml"))
        .await
        .expect("2025 saved");
    assert_eq!(
        message,
        "Saved individual inputs for ΠΑΠΑΔΟΠΟΥΛΟΣ ΓΕΩΡΓΙΟΣ, fiscal year 2025\n"
    );

    let out = app::show(repo.as_ref(), "papadopoulos", 2025, ScenarioKind::Individual, false)
        .await
        .expect("shows");

    assert!(out.starts_with("ΠΑΠΑΔΟΠΟΥΛΟΣ ΓΕΩΡΓΙΟΣ (134467717), fiscal year 2025\n"));
    let tax_line = out
        .lines()
        .find(|line| line.starts_with("Income tax due"))
        .expect("tax line");
    assert!(tax_line.contains("2.307,54 €"), "{tax_line}");
    assert!(tax_line.contains("3.458,76 €"), "{tax_line}");
    // Stored previous-year prepayment is used as is
    assert!(out.contains("2.096,29 €"));
    assert!(out.contains("14.301,63 €"));
}

#[tokio::test]
async fn carry_prepayment_uses_prior_year_result() {
    let repo = repo_with_sample_business().await;
    app::save_inputs(repo.as_ref(), "papadopoulos", 2024, &load("sample_2024.toml"))
        .await
        .unwrap();
    app::save_inputs(repo.as_ref(), "papadopoulos", 2025, &load("sample_2025.toml"))
        .await
        .unwrap();

    let out = app::show(repo.as_ref(), "papadopoulos", 2025, ScenarioKind::Individual, true)
        .await
        .expect("shows");

    // 2024 prepayment 1 902.32 replaces the stored 1 480.40
    assert!(out.contains("1.674,37 €"));
    assert!(out.contains("14.723,55 €"));
}

#[tokio::test]
async fn compare_lists_available_scenarios() {
    let repo = repo_with_sample_business().await;
    app::save_inputs(repo.as_ref(), "papadopoulos", 2025, &load("all_scenarios.toml"))
        .await
        .unwrap();

    let out = app::compare(repo.as_ref(), "papadopoulos", 2025, false)
        .await
        .expect("compares");

    let rows = out
        .lines()
        .filter(|line| ScenarioKind::ALL.iter().any(|k| line.starts_with(k.title())))
        .count();
    assert_eq!(rows, 5);
    assert!(
        repo.get_business("papadopoulos")
            .await
            .unwrap()
            .last_calculation_at
            .is_some()
    );
}

#[tokio::test]
async fn compare_without_inputs_says_so() {
    let repo = repo_with_sample_business().await;

    let out = app::compare(repo.as_ref(), "papadopoulos", 2030, false)
        .await
        .expect("compares");

    assert!(out.contains("No scenario has the inputs it needs."));
}

#[tokio::test]
async fn saving_empty_file_is_rejected() {
    let repo = repo_with_sample_business().await;

    let err = app::save_inputs(repo.as_ref(), "papadopoulos", 2025, &InputFile::default())
        .await
        .expect_err("nothing to save");

    assert!(err.to_string().contains("no [individual], [company] or [employee] section"));
}

#[tokio::test]
async fn deleting_business_removes_inputs() {
    let repo = repo_with_sample_business().await;
    app::save_inputs(repo.as_ref(), "papadopoulos", 2025, &load("sample_2025.toml"))
        .await
        .unwrap();

    app::delete_business(repo.as_ref(), "papadopoulos")
        .await
        .expect("deleted");

    assert!(repo.list_individual_inputs("papadopoulos").await.unwrap().is_empty());
    assert_eq!(
        app::list_businesses(repo.as_ref()).await.unwrap(),
        "No businesses.\n"
    );
}
