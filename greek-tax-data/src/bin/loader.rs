use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use greek_tax_data::InputsLoader;
use greek_tax_db_sqlite::SqliteRepository;
use tracing_subscriber::EnvFilter;

/// Load fiscal-year inputs from CSV files into the database.
///
/// Every CSV starts with `business_id` and `fiscal_year`, followed by the
/// snake_case input fields of its kind. Empty cells are read as zero.
/// Rows are upserted, so loading the same file twice is harmless.
#[derive(Parser, Debug)]
#[command(name = "greek-tax-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// SQLite database URL (e.g., sqlite:tax.db?mode=rwc to create if missing)
    #[arg(short, long, default_value = "sqlite:tax.db?mode=rwc")]
    database: String,

    /// Run database migrations before loading data
    #[arg(short, long, default_value_t = false)]
    migrate: bool,

    /// Run seed files from the specified directory after migrations
    #[arg(short, long)]
    seeds: Option<PathBuf>,

    /// CSV file of individual-business inputs
    #[arg(long)]
    individual: Option<PathBuf>,

    /// CSV file of company inputs
    #[arg(long)]
    company: Option<PathBuf>,

    /// CSV file of employee inputs
    #[arg(long)]
    employee: Option<PathBuf>,
}

fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("Failed to open: {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();

    let repo = SqliteRepository::new(&args.database)
        .await
        .with_context(|| format!("Failed to connect to database: {}", args.database))?;

    if args.migrate {
        println!("Running migrations...");
        repo.run_migrations()
            .await
            .context("Failed to run migrations")?;
        println!("Migrations complete.");
    }

    if let Some(seeds_dir) = &args.seeds {
        println!("Running seeds from: {}", seeds_dir.display());
        repo.run_seeds(seeds_dir)
            .await
            .with_context(|| format!("Failed to run seeds from: {}", seeds_dir.display()))?;
        println!("Seeds complete.");
    }

    if let Some(path) = &args.individual {
        let records = InputsLoader::parse_individual(open(path)?)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
        let loaded = InputsLoader::load_individual(&repo, &records)
            .await
            .context("Failed to load individual inputs into database")?;
        println!("Loaded {} individual input records from {}", loaded, path.display());
    }

    if let Some(path) = &args.company {
        let records = InputsLoader::parse_company(open(path)?)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
        let loaded = InputsLoader::load_company(&repo, &records)
            .await
            .context("Failed to load company inputs into database")?;
        println!("Loaded {} company input records from {}", loaded, path.display());
    }

    if let Some(path) = &args.employee {
        let records = InputsLoader::parse_employee(open(path)?)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
        let loaded = InputsLoader::load_employee(&repo, &records)
            .await
            .context("Failed to load employee inputs into database")?;
        println!("Loaded {} employee input records from {}", loaded, path.display());
    }

    Ok(())
}
