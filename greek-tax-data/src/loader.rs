use std::io::Read;

use greek_tax_core::models::parse_amount;
use greek_tax_core::{
    CompanyInputs, EmployeeInputs, IncomeStatement, IndividualBusinessInputs, RepositoryError,
    TaxRepository,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when loading fiscal-year inputs.
#[derive(Debug, Error)]
pub enum InputsLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Business '{0}' not found in database (create it first or run the seeds)")]
    BusinessNotFound(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for InputsLoaderError {
    fn from(err: csv::Error) -> Self {
        InputsLoaderError::CsvParse(err.to_string())
    }
}

/// Columns every inputs CSV starts with; all others hold amounts.
const KEY_COLUMNS: [&str; 2] = ["business_id", "fiscal_year"];

/// Empty cells are absent amounts and read as zero.
///
/// The column is not known here; [`cell_error`] names it when parsing fails.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) => match parse_amount("", &s) {
            Ok(amount) => Ok(amount),
            Err(_) => Err(serde::de::Error::custom(format!(
                "'{}' is not a valid amount",
                s.trim()
            ))),
        },
        None => Ok(Decimal::ZERO),
    }
}

/// A row of the individual-business inputs CSV.
///
/// Columns: `business_id`, `fiscal_year`, the eleven income-statement lines,
/// then `deemed_taxation`, `business_withholdings`, `previous_year_prepayment`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct IndividualInputsRecord {
    pub business_id: String,
    pub fiscal_year: i32,
    #[serde(deserialize_with = "deserialize_amount")]
    pub net_turnover: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub other_ordinary_income: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub inventory_changes: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub purchases_goods_materials: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub employee_benefits: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub depreciation: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub other_expenses_losses: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub other_income_gains: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub interest_net: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub adjustments: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub carried_forward_losses: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub deemed_taxation: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub business_withholdings: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub previous_year_prepayment: Decimal,
}

impl IndividualInputsRecord {
    pub fn inputs(&self) -> IndividualBusinessInputs {
        IndividualBusinessInputs {
            statement: IncomeStatement {
                net_turnover: self.net_turnover,
                other_ordinary_income: self.other_ordinary_income,
                inventory_changes: self.inventory_changes,
                purchases_goods_materials: self.purchases_goods_materials,
                employee_benefits: self.employee_benefits,
                depreciation: self.depreciation,
                other_expenses_losses: self.other_expenses_losses,
                other_income_gains: self.other_income_gains,
                interest_net: self.interest_net,
                adjustments: self.adjustments,
                carried_forward_losses: self.carried_forward_losses,
            },
            deemed_taxation: self.deemed_taxation,
            business_withholdings: self.business_withholdings,
            previous_year_prepayment: self.previous_year_prepayment,
        }
    }
}

/// A row of the company inputs CSV.
///
/// Same statement columns as [`IndividualInputsRecord`], followed by
/// `business_withholdings`, `previous_year_prepayment`, `professional_fee`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CompanyInputsRecord {
    pub business_id: String,
    pub fiscal_year: i32,
    #[serde(deserialize_with = "deserialize_amount")]
    pub net_turnover: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub other_ordinary_income: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub inventory_changes: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub purchases_goods_materials: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub employee_benefits: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub depreciation: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub other_expenses_losses: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub other_income_gains: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub interest_net: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub adjustments: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub carried_forward_losses: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub business_withholdings: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub previous_year_prepayment: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub professional_fee: Decimal,
}

impl CompanyInputsRecord {
    pub fn inputs(&self) -> CompanyInputs {
        CompanyInputs {
            statement: IncomeStatement {
                net_turnover: self.net_turnover,
                other_ordinary_income: self.other_ordinary_income,
                inventory_changes: self.inventory_changes,
                purchases_goods_materials: self.purchases_goods_materials,
                employee_benefits: self.employee_benefits,
                depreciation: self.depreciation,
                other_expenses_losses: self.other_expenses_losses,
                other_income_gains: self.other_income_gains,
                interest_net: self.interest_net,
                adjustments: self.adjustments,
                carried_forward_losses: self.carried_forward_losses,
            },
            business_withholdings: self.business_withholdings,
            previous_year_prepayment: self.previous_year_prepayment,
            professional_fee: self.professional_fee,
        }
    }
}

/// A row of the employee inputs CSV.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EmployeeInputsRecord {
    pub business_id: String,
    pub fiscal_year: i32,
    #[serde(deserialize_with = "deserialize_amount")]
    pub employee_income: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub tax_reductions: Decimal,
    #[serde(deserialize_with = "deserialize_amount")]
    pub employee_withholdings: Decimal,
}

impl EmployeeInputsRecord {
    pub fn inputs(&self) -> EmployeeInputs {
        EmployeeInputs {
            employee_income: self.employee_income,
            tax_reductions: self.tax_reductions,
            employee_withholdings: self.employee_withholdings,
        }
    }
}

fn parse_records<R, T>(reader: R) -> Result<Vec<T>, InputsLoaderError>
where
    R: Read,
    T: serde::de::DeserializeOwned,
{
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut records = Vec::new();

    for result in csv_reader.records() {
        let row = result?;
        let record: T = row
            .deserialize(Some(&headers))
            .map_err(|e| cell_error(&headers, &row, e))?;
        records.push(record);
    }

    Ok(records)
}

/// Names the column and line of the first amount cell in `row` that does
/// not parse, falling back to the csv error itself.
fn cell_error(
    headers: &csv::StringRecord,
    row: &csv::StringRecord,
    err: csv::Error,
) -> InputsLoaderError {
    let invalid = headers
        .iter()
        .zip(row.iter())
        .filter(|(column, _)| !KEY_COLUMNS.contains(column))
        .find_map(|(column, cell)| parse_amount(column, cell).err());

    match invalid {
        Some(invalid) => {
            let line = row
                .position()
                .map(|p| p.line().to_string())
                .unwrap_or_else(|| "?".to_string());
            InputsLoaderError::CsvParse(format!("line {line}: {invalid}"))
        }
        None => InputsLoaderError::from(err),
    }
}

/// A foreign-key failure on upsert means the business row is missing.
fn upsert_error(
    business_id: &str,
    err: RepositoryError,
) -> InputsLoaderError {
    if let RepositoryError::Database(ref inner) = err {
        if inner.contains("FOREIGN KEY constraint failed") {
            return InputsLoaderError::BusinessNotFound(business_id.to_string());
        }
    }
    InputsLoaderError::Repository(err)
}

/// Loader for fiscal-year inputs from CSV files.
///
/// Parsing is separate from loading so a file can be validated in full before
/// anything is written. Loading goes through [`TaxRepository`] upserts, so it
/// works with any backend and running the same load twice leaves the same
/// data behind.
pub struct InputsLoader;

impl InputsLoader {
    pub fn parse_individual<R: Read>(
        reader: R
    ) -> Result<Vec<IndividualInputsRecord>, InputsLoaderError> {
        parse_records(reader)
    }

    pub fn parse_company<R: Read>(reader: R) -> Result<Vec<CompanyInputsRecord>, InputsLoaderError> {
        parse_records(reader)
    }

    pub fn parse_employee<R: Read>(
        reader: R
    ) -> Result<Vec<EmployeeInputsRecord>, InputsLoaderError> {
        parse_records(reader)
    }

    /// Upserts every record and returns how many were written.
    pub async fn load_individual<R: TaxRepository + ?Sized>(
        repo: &R,
        records: &[IndividualInputsRecord],
    ) -> Result<usize, InputsLoaderError> {
        for record in records {
            repo.upsert_individual_inputs(&record.business_id, record.fiscal_year, &record.inputs())
                .await
                .map_err(|e| upsert_error(&record.business_id, e))?;
            debug!(business_id = %record.business_id, fiscal_year = record.fiscal_year, "individual row loaded");
        }

        info!(count = records.len(), "individual inputs loaded");
        Ok(records.len())
    }

    pub async fn load_company<R: TaxRepository + ?Sized>(
        repo: &R,
        records: &[CompanyInputsRecord],
    ) -> Result<usize, InputsLoaderError> {
        for record in records {
            repo.upsert_company_inputs(&record.business_id, record.fiscal_year, &record.inputs())
                .await
                .map_err(|e| upsert_error(&record.business_id, e))?;
            debug!(business_id = %record.business_id, fiscal_year = record.fiscal_year, "company row loaded");
        }

        info!(count = records.len(), "company inputs loaded");
        Ok(records.len())
    }

    pub async fn load_employee<R: TaxRepository + ?Sized>(
        repo: &R,
        records: &[EmployeeInputsRecord],
    ) -> Result<usize, InputsLoaderError> {
        for record in records {
            repo.upsert_employee_inputs(&record.business_id, record.fiscal_year, &record.inputs())
                .await
                .map_err(|e| upsert_error(&record.business_id, e))?;
            debug!(business_id = %record.business_id, fiscal_year = record.fiscal_year, "employee row loaded");
        }

        info!(count = records.len(), "employee inputs loaded");
        Ok(records.len())
    }
}
