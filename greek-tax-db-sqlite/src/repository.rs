use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use greek_tax_core::{
    Business, CompanyInputs, EmployeeInputs, FiscalYearRecord, IncomeStatement,
    IndividualBusinessInputs, NewBusiness, RepositoryError, TaxRepository,
};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use tracing::{debug, info};

use crate::decimal::{decimal_to_text, get_decimal};

const INDIVIDUAL_COLUMNS: &str = "business_id, fiscal_year,
    net_turnover, other_ordinary_income, inventory_changes, purchases_goods_materials,
    employee_benefits, depreciation, other_expenses_losses, other_income_gains, interest_net,
    adjustments, carried_forward_losses,
    deemed_taxation, business_withholdings, previous_year_prepayment,
    created_at, updated_at";

const COMPANY_COLUMNS: &str = "business_id, fiscal_year,
    net_turnover, other_ordinary_income, inventory_changes, purchases_goods_materials,
    employee_benefits, depreciation, other_expenses_losses, other_income_gains, interest_net,
    adjustments, carried_forward_losses,
    business_withholdings, previous_year_prepayment, professional_fee,
    created_at, updated_at";

const EMPLOYEE_COLUMNS: &str = "business_id, fiscal_year,
    employee_income, tax_reductions, employee_withholdings,
    created_at, updated_at";

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Load and execute all SQL seed files from the specified directory.
    /// Files are executed in alphabetical order by filename.
    pub async fn run_seeds(
        &self,
        seeds_dir: &Path,
    ) -> Result<()> {
        let mut entries: Vec<_> = std::fs::read_dir(seeds_dir)
            .with_context(|| format!("Failed to read seeds directory '{}'", seeds_dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "sql"))
            .collect();

        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let sql = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read seed file '{}'", path.display()))?;

            sqlx::raw_sql(&sql)
                .execute(&self.pool)
                .await
                .with_context(|| format!("Failed to execute seed file '{}'", path.display()))?;
            debug!(file = %path.display(), "seed file applied");
        }

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn db_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

fn get_timestamp(
    row: &SqliteRow,
    column: &str,
) -> Result<DateTime<Utc>, RepositoryError> {
    row.try_get::<DateTime<Utc>, _>(column)
        .map_err(|e| RepositoryError::Database(format!("Failed to get {}: {}", column, e)))
}

fn row_to_business(row: &SqliteRow) -> Result<Business, RepositoryError> {
    Ok(Business {
        id: row.try_get("id").map_err(db_err)?,
        business_name: row.try_get("business_name").map_err(db_err)?,
        activity: row.try_get("activity").map_err(db_err)?,
        address: row.try_get("address").map_err(db_err)?,
        tax_id: row.try_get("tax_id").map_err(db_err)?,
        last_calculation_at: row
            .try_get::<Option<DateTime<Utc>>, _>("last_calculation_at")
            .map_err(|e| {
                RepositoryError::Database(format!("Failed to get last_calculation_at: {}", e))
            })?,
        created_at: get_timestamp(row, "created_at")?,
        updated_at: get_timestamp(row, "updated_at")?,
    })
}

fn row_to_statement(row: &SqliteRow) -> Result<IncomeStatement, RepositoryError> {
    Ok(IncomeStatement {
        net_turnover: get_decimal(row, "net_turnover")?,
        other_ordinary_income: get_decimal(row, "other_ordinary_income")?,
        inventory_changes: get_decimal(row, "inventory_changes")?,
        purchases_goods_materials: get_decimal(row, "purchases_goods_materials")?,
        employee_benefits: get_decimal(row, "employee_benefits")?,
        depreciation: get_decimal(row, "depreciation")?,
        other_expenses_losses: get_decimal(row, "other_expenses_losses")?,
        other_income_gains: get_decimal(row, "other_income_gains")?,
        interest_net: get_decimal(row, "interest_net")?,
        adjustments: get_decimal(row, "adjustments")?,
        carried_forward_losses: get_decimal(row, "carried_forward_losses")?,
    })
}

fn row_to_record<T>(
    row: &SqliteRow,
    inputs: T,
) -> Result<FiscalYearRecord<T>, RepositoryError> {
    Ok(FiscalYearRecord {
        business_id: row.try_get("business_id").map_err(db_err)?,
        fiscal_year: row.try_get("fiscal_year").map_err(db_err)?,
        inputs,
        created_at: get_timestamp(row, "created_at")?,
        updated_at: get_timestamp(row, "updated_at")?,
    })
}

fn row_to_individual(
    row: &SqliteRow,
) -> Result<FiscalYearRecord<IndividualBusinessInputs>, RepositoryError> {
    let inputs = IndividualBusinessInputs {
        statement: row_to_statement(row)?,
        deemed_taxation: get_decimal(row, "deemed_taxation")?,
        business_withholdings: get_decimal(row, "business_withholdings")?,
        previous_year_prepayment: get_decimal(row, "previous_year_prepayment")?,
    };
    row_to_record(row, inputs)
}

fn row_to_company(row: &SqliteRow) -> Result<FiscalYearRecord<CompanyInputs>, RepositoryError> {
    let inputs = CompanyInputs {
        statement: row_to_statement(row)?,
        business_withholdings: get_decimal(row, "business_withholdings")?,
        previous_year_prepayment: get_decimal(row, "previous_year_prepayment")?,
        professional_fee: get_decimal(row, "professional_fee")?,
    };
    row_to_record(row, inputs)
}

fn row_to_employee(row: &SqliteRow) -> Result<FiscalYearRecord<EmployeeInputs>, RepositoryError> {
    let inputs = EmployeeInputs {
        employee_income: get_decimal(row, "employee_income")?,
        tax_reductions: get_decimal(row, "tax_reductions")?,
        employee_withholdings: get_decimal(row, "employee_withholdings")?,
    };
    row_to_record(row, inputs)
}

/// Statement lines as TEXT, in column order.
fn statement_values(statement: &IncomeStatement) -> [String; 11] {
    [
        decimal_to_text(statement.net_turnover),
        decimal_to_text(statement.other_ordinary_income),
        decimal_to_text(statement.inventory_changes),
        decimal_to_text(statement.purchases_goods_materials),
        decimal_to_text(statement.employee_benefits),
        decimal_to_text(statement.depreciation),
        decimal_to_text(statement.other_expenses_losses),
        decimal_to_text(statement.other_income_gains),
        decimal_to_text(statement.interest_net),
        decimal_to_text(statement.adjustments),
        decimal_to_text(statement.carried_forward_losses),
    ]
}

#[async_trait]
impl TaxRepository for SqliteRepository {
    async fn create_business(
        &self,
        business: NewBusiness,
    ) -> Result<Business, RepositoryError> {
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO business (id, business_name, activity, address, tax_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&business.id)
        .bind(&business.business_name)
        .bind(&business.activity)
        .bind(&business.address)
        .bind(&business.tax_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        info!(id = %business.id, "business created");
        self.get_business(&business.id).await
    }

    async fn get_business(
        &self,
        id: &str,
    ) -> Result<Business, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, business_name, activity, address, tax_id,
                    last_calculation_at, created_at, updated_at
             FROM business WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(RepositoryError::NotFound)?;

        row_to_business(&row)
    }

    async fn list_businesses(&self) -> Result<Vec<Business>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, business_name, activity, address, tax_id,
                    last_calculation_at, created_at, updated_at
             FROM business ORDER BY business_name, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(row_to_business).collect()
    }

    async fn touch_business(
        &self,
        id: &str,
    ) -> Result<(), RepositoryError> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE business SET last_calculation_at = ?, updated_at = ? WHERE id = ?",
        )
        .bind(now)
        .bind(now)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn delete_business(
        &self,
        id: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM business WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!(id, "business deleted");
        Ok(())
    }

    async fn upsert_individual_inputs(
        &self,
        business_id: &str,
        fiscal_year: i32,
        inputs: &IndividualBusinessInputs,
    ) -> Result<FiscalYearRecord<IndividualBusinessInputs>, RepositoryError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO individual_inputs ({INDIVIDUAL_COLUMNS})
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (business_id, fiscal_year) DO UPDATE SET
                net_turnover = excluded.net_turnover,
                other_ordinary_income = excluded.other_ordinary_income,
                inventory_changes = excluded.inventory_changes,
                purchases_goods_materials = excluded.purchases_goods_materials,
                employee_benefits = excluded.employee_benefits,
                depreciation = excluded.depreciation,
                other_expenses_losses = excluded.other_expenses_losses,
                other_income_gains = excluded.other_income_gains,
                interest_net = excluded.interest_net,
                adjustments = excluded.adjustments,
                carried_forward_losses = excluded.carried_forward_losses,
                deemed_taxation = excluded.deemed_taxation,
                business_withholdings = excluded.business_withholdings,
                previous_year_prepayment = excluded.previous_year_prepayment,
                updated_at = excluded.updated_at"
        );

        let mut query = sqlx::query(&sql).bind(business_id).bind(fiscal_year);
        for value in statement_values(&inputs.statement) {
            query = query.bind(value);
        }
        query
            .bind(decimal_to_text(inputs.deemed_taxation))
            .bind(decimal_to_text(inputs.business_withholdings))
            .bind(decimal_to_text(inputs.previous_year_prepayment))
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        info!(business_id, fiscal_year, "individual inputs saved");
        self.get_individual_inputs(business_id, fiscal_year).await
    }

    async fn get_individual_inputs(
        &self,
        business_id: &str,
        fiscal_year: i32,
    ) -> Result<FiscalYearRecord<IndividualBusinessInputs>, RepositoryError> {
        let sql = format!(
            "SELECT {INDIVIDUAL_COLUMNS} FROM individual_inputs
             WHERE business_id = ? AND fiscal_year = ?"
        );
        let row = sqlx::query(&sql)
            .bind(business_id)
            .bind(fiscal_year)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .ok_or(RepositoryError::NotFound)?;

        row_to_individual(&row)
    }

    async fn list_individual_inputs(
        &self,
        business_id: &str,
    ) -> Result<Vec<FiscalYearRecord<IndividualBusinessInputs>>, RepositoryError> {
        let sql = format!(
            "SELECT {INDIVIDUAL_COLUMNS} FROM individual_inputs
             WHERE business_id = ? ORDER BY fiscal_year DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(business_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter().map(row_to_individual).collect()
    }

    async fn upsert_company_inputs(
        &self,
        business_id: &str,
        fiscal_year: i32,
        inputs: &CompanyInputs,
    ) -> Result<FiscalYearRecord<CompanyInputs>, RepositoryError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO company_inputs ({COMPANY_COLUMNS})
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (business_id, fiscal_year) DO UPDATE SET
                net_turnover = excluded.net_turnover,
                other_ordinary_income = excluded.other_ordinary_income,
                inventory_changes = excluded.inventory_changes,
                purchases_goods_materials = excluded.purchases_goods_materials,
                employee_benefits = excluded.employee_benefits,
                depreciation = excluded.depreciation,
                other_expenses_losses = excluded.other_expenses_losses,
                other_income_gains = excluded.other_income_gains,
                interest_net = excluded.interest_net,
                adjustments = excluded.adjustments,
                carried_forward_losses = excluded.carried_forward_losses,
                business_withholdings = excluded.business_withholdings,
                previous_year_prepayment = excluded.previous_year_prepayment,
                professional_fee = excluded.professional_fee,
                updated_at = excluded.updated_at"
        );

        let mut query = sqlx::query(&sql).bind(business_id).bind(fiscal_year);
        for value in statement_values(&inputs.statement) {
            query = query.bind(value);
        }
        query
            .bind(decimal_to_text(inputs.business_withholdings))
            .bind(decimal_to_text(inputs.previous_year_prepayment))
            .bind(decimal_to_text(inputs.professional_fee))
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        info!(business_id, fiscal_year, "company inputs saved");
        self.get_company_inputs(business_id, fiscal_year).await
    }

    async fn get_company_inputs(
        &self,
        business_id: &str,
        fiscal_year: i32,
    ) -> Result<FiscalYearRecord<CompanyInputs>, RepositoryError> {
        let sql = format!(
            "SELECT {COMPANY_COLUMNS} FROM company_inputs
             WHERE business_id = ? AND fiscal_year = ?"
        );
        let row = sqlx::query(&sql)
            .bind(business_id)
            .bind(fiscal_year)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .ok_or(RepositoryError::NotFound)?;

        row_to_company(&row)
    }

    async fn list_company_inputs(
        &self,
        business_id: &str,
    ) -> Result<Vec<FiscalYearRecord<CompanyInputs>>, RepositoryError> {
        let sql = format!(
            "SELECT {COMPANY_COLUMNS} FROM company_inputs
             WHERE business_id = ? ORDER BY fiscal_year DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(business_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter().map(row_to_company).collect()
    }

    async fn upsert_employee_inputs(
        &self,
        business_id: &str,
        fiscal_year: i32,
        inputs: &EmployeeInputs,
    ) -> Result<FiscalYearRecord<EmployeeInputs>, RepositoryError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO employee_inputs ({EMPLOYEE_COLUMNS})
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (business_id, fiscal_year) DO UPDATE SET
                employee_income = excluded.employee_income,
                tax_reductions = excluded.tax_reductions,
                employee_withholdings = excluded.employee_withholdings,
                updated_at = excluded.updated_at"
        );

        sqlx::query(&sql)
            .bind(business_id)
            .bind(fiscal_year)
            .bind(decimal_to_text(inputs.employee_income))
            .bind(decimal_to_text(inputs.tax_reductions))
            .bind(decimal_to_text(inputs.employee_withholdings))
            .bind(now)
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        info!(business_id, fiscal_year, "employee inputs saved");
        self.get_employee_inputs(business_id, fiscal_year).await
    }

    async fn get_employee_inputs(
        &self,
        business_id: &str,
        fiscal_year: i32,
    ) -> Result<FiscalYearRecord<EmployeeInputs>, RepositoryError> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employee_inputs
             WHERE business_id = ? AND fiscal_year = ?"
        );
        let row = sqlx::query(&sql)
            .bind(business_id)
            .bind(fiscal_year)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .ok_or(RepositoryError::NotFound)?;

        row_to_employee(&row)
    }

    async fn list_employee_inputs(
        &self,
        business_id: &str,
    ) -> Result<Vec<FiscalYearRecord<EmployeeInputs>>, RepositoryError> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employee_inputs
             WHERE business_id = ? ORDER BY fiscal_year DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(business_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter().map(row_to_employee).collect()
    }
}
