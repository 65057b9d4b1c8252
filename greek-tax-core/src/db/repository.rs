use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    Business, CompanyInputs, EmployeeInputs, FiscalYearRecord, IndividualBusinessInputs,
    NewBusiness,
};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A stored or submitted value failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Storage for businesses and their fiscal-year inputs.
///
/// Inputs are keyed by `(business_id, fiscal_year)`; there is at most one
/// record of each kind per key. Upserts create the record when absent and
/// otherwise overwrite every field and refresh `updated_at`. Results are never
/// stored.
#[async_trait]
pub trait TaxRepository: Send + Sync {
    // Businesses
    async fn create_business(
        &self,
        business: NewBusiness,
    ) -> Result<Business, RepositoryError>;
    async fn get_business(
        &self,
        id: &str,
    ) -> Result<Business, RepositoryError>;
    async fn list_businesses(&self) -> Result<Vec<Business>, RepositoryError>;
    /// Stamps `last_calculation_at` with the current time.
    async fn touch_business(
        &self,
        id: &str,
    ) -> Result<(), RepositoryError>;
    /// Removes the business and every input record it owns.
    async fn delete_business(
        &self,
        id: &str,
    ) -> Result<(), RepositoryError>;

    // Individual business inputs
    async fn upsert_individual_inputs(
        &self,
        business_id: &str,
        fiscal_year: i32,
        inputs: &IndividualBusinessInputs,
    ) -> Result<FiscalYearRecord<IndividualBusinessInputs>, RepositoryError>;
    async fn get_individual_inputs(
        &self,
        business_id: &str,
        fiscal_year: i32,
    ) -> Result<FiscalYearRecord<IndividualBusinessInputs>, RepositoryError>;
    /// Most recent fiscal year first.
    async fn list_individual_inputs(
        &self,
        business_id: &str,
    ) -> Result<Vec<FiscalYearRecord<IndividualBusinessInputs>>, RepositoryError>;

    // Company inputs
    async fn upsert_company_inputs(
        &self,
        business_id: &str,
        fiscal_year: i32,
        inputs: &CompanyInputs,
    ) -> Result<FiscalYearRecord<CompanyInputs>, RepositoryError>;
    async fn get_company_inputs(
        &self,
        business_id: &str,
        fiscal_year: i32,
    ) -> Result<FiscalYearRecord<CompanyInputs>, RepositoryError>;
    async fn list_company_inputs(
        &self,
        business_id: &str,
    ) -> Result<Vec<FiscalYearRecord<CompanyInputs>>, RepositoryError>;

    // Employee inputs
    async fn upsert_employee_inputs(
        &self,
        business_id: &str,
        fiscal_year: i32,
        inputs: &EmployeeInputs,
    ) -> Result<FiscalYearRecord<EmployeeInputs>, RepositoryError>;
    async fn get_employee_inputs(
        &self,
        business_id: &str,
        fiscal_year: i32,
    ) -> Result<FiscalYearRecord<EmployeeInputs>, RepositoryError>;
    async fn list_employee_inputs(
        &self,
        business_id: &str,
    ) -> Result<Vec<FiscalYearRecord<EmployeeInputs>>, RepositoryError>;
}

/// Turns a `NotFound` into `None`, passing every other outcome through.
pub trait OptionalRecord<T> {
    fn optional(self) -> Result<Option<T>, RepositoryError>;
}

impl<T> OptionalRecord<T> for Result<T, RepositoryError> {
    fn optional(self) -> Result<Option<T>, RepositoryError> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(RepositoryError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
