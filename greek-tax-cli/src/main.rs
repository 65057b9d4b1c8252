use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use greek_tax_cli::config::Settings;
use greek_tax_cli::input_file::InputFile;
use greek_tax_cli::{app, logging};
use greek_tax_core::{ScenarioKind, TaxRepository};
use tracing::debug;

/// Greek business income tax calculator.
///
/// Settings come from `--config`, `$GREEK_TAX_CONFIG` or `./greek-tax.toml`,
/// in that order; the flags below override them.
#[derive(Parser, Debug)]
#[command(name = "greek-tax")]
#[command(version, about, long_about = None)]
struct Cli {
    /// TOML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Storage backend (default: sqlite)
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Connection string, e.g. greek-tax.db or :memory:
    #[arg(long, global = true)]
    db: Option<String>,

    /// Log level or EnvFilter directive, e.g. debug or greek_tax_core=trace
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Append log output to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run scenarios on an inputs file without touching the database
    Calculate {
        /// TOML inputs file
        #[arg(short, long)]
        inputs: PathBuf,

        /// Run only this scenario; all applicable ones otherwise
        #[arg(short, long, value_parser = parse_scenario)]
        scenario: Option<ScenarioKind>,
    },

    /// Manage businesses
    Business {
        #[command(subcommand)]
        action: BusinessCommand,
    },

    /// Store the inputs of a fiscal year
    Save {
        #[arg(short, long)]
        business: String,

        #[arg(short, long, value_parser = fiscal_year_parser())]
        year: i32,

        /// TOML inputs file
        #[arg(short, long)]
        inputs: PathBuf,
    },

    /// Recompute one scenario from stored inputs, next to the prior year
    Show {
        #[arg(short, long)]
        business: String,

        #[arg(short, long, value_parser = fiscal_year_parser())]
        year: i32,

        #[arg(short, long, value_parser = parse_scenario)]
        scenario: ScenarioKind,

        /// Take previous-year prepayments from the prior year's results
        #[arg(long, default_value_t = false)]
        carry_prepayment: bool,
    },

    /// Summarize every scenario the stored inputs allow
    Compare {
        #[arg(short, long)]
        business: String,

        #[arg(short, long, value_parser = fiscal_year_parser())]
        year: i32,

        /// Take previous-year prepayments from the prior year's results
        #[arg(long, default_value_t = false)]
        carry_prepayment: bool,
    },
}

#[derive(Subcommand, Debug)]
enum BusinessCommand {
    /// Register a business
    Add {
        #[arg(long)]
        name: String,

        /// Greek tax id (AFM), 9 digits
        #[arg(long)]
        tax_id: String,

        #[arg(long, default_value = "")]
        activity: String,

        #[arg(long, default_value = "")]
        address: String,

        /// Identifier to use instead of a generated one
        #[arg(long)]
        id: Option<String>,
    },

    /// List businesses
    List,

    /// Delete a business and all of its stored inputs
    Delete {
        #[arg(long)]
        id: String,
    },
}

/// Fiscal years accepted on the command line.
const FISCAL_YEARS: std::ops::RangeInclusive<i64> = 1900..=9999;

fn fiscal_year_parser() -> clap::builder::RangedI64ValueParser<i32> {
    clap::value_parser!(i32).range(FISCAL_YEARS)
}

fn parse_scenario(s: &str) -> Result<ScenarioKind, String> {
    ScenarioKind::parse(s).ok_or_else(|| {
        let known: Vec<_> = ScenarioKind::ALL.iter().map(|k| k.as_str()).collect();
        format!("unknown scenario '{s}'; expected one of: {}", known.join(", "))
    })
}

fn calculate_file(
    inputs: &Path,
    scenario: Option<ScenarioKind>,
) -> Result<String> {
    let file = InputFile::load(inputs)
        .with_context(|| format!("Failed to read inputs: {}", inputs.display()))?;
    app::calculate(&file, scenario)
}

async fn run_stored(
    repo: &dyn TaxRepository,
    command: Command,
) -> Result<String> {
    match command {
        Command::Calculate { inputs, scenario } => calculate_file(&inputs, scenario),
        Command::Business { action } => match action {
            BusinessCommand::Add {
                name,
                tax_id,
                activity,
                address,
                id,
            } => {
                let business =
                    app::add_business(repo, id, &name, &activity, &address, &tax_id).await?;
                Ok(format!("Created business {} ({})\n", business.id, business.business_name))
            }
            BusinessCommand::List => app::list_businesses(repo).await,
            BusinessCommand::Delete { id } => app::delete_business(repo, &id).await,
        },
        Command::Save {
            business,
            year,
            inputs,
        } => {
            let file = InputFile::load(&inputs)
                .with_context(|| format!("Failed to read inputs: {}", inputs.display()))?;
            app::save_inputs(repo, &business, year, &file).await
        }
        Command::Show {
            business,
            year,
            scenario,
            carry_prepayment,
        } => app::show(repo, &business, year, scenario, carry_prepayment).await,
        Command::Compare {
            business,
            year,
            carry_prepayment,
        } => app::compare(repo, &business, year, carry_prepayment).await,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_default_logging();

    let cli = Cli::parse();
    let settings = Settings::resolve(cli.config.as_deref())?;

    if let Some(level) = cli.log_level.as_deref().or(settings.logging.level.as_deref()) {
        logging::set_log_level(level)?;
    }
    if let Some(path) = cli.log_file.as_ref().or(settings.logging.file.as_ref()) {
        logging::enable_file_logging(path)?;
    }

    let output = match cli.command {
        Command::Calculate { inputs, scenario } => calculate_file(&inputs, scenario)?,
        command => {
            let mut db = settings.db_config();
            if let Some(backend) = cli.backend {
                db.backend = backend;
            }
            if let Some(connection_string) = cli.db {
                db.connection_string = connection_string;
            }
            debug!(backend = %db.backend, connection = %db.connection_string, "database selected");

            let repo = app::open_repository(&db).await?;
            run_stored(repo.as_ref(), command).await?
        }
    };

    print!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn show_parses_year_and_scenario() {
        let cli = Cli::try_parse_from([
            "greek-tax", "show", "--business", "b-1", "--year", "2025", "--scenario", "full",
        ])
        .expect("parses");

        let Command::Show { year, scenario, carry_prepayment, .. } = cli.command else {
            panic!("expected show, got {:?}", cli.command);
        };
        assert_eq!(year, 2025);
        assert_eq!(scenario, ScenarioKind::Full);
        assert!(!carry_prepayment);
    }

    #[test]
    fn year_outside_range_is_rejected() {
        for year in ["-2147483648", "0", "1899", "10000"] {
            let result = Cli::try_parse_from([
                "greek-tax", "compare", "--business", "b-1", "--year", year,
            ]);
            assert!(result.is_err(), "{year} accepted");
        }
        assert!(
            Cli::try_parse_from(["greek-tax", "save", "-b", "b-1", "-y", "1900", "-i", "x.toml"])
                .is_ok()
        );
    }

    #[test]
    fn unknown_scenario_is_rejected() {
        let err = Cli::try_parse_from([
            "greek-tax", "calculate", "--inputs", "x.toml", "--scenario", "partnership",
        ])
        .expect_err("unknown scenario");

        assert!(err.to_string().contains("unknown scenario 'partnership'"));
    }
}
