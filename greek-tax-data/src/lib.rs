//! Bulk loading of fiscal-year inputs from CSV.

mod loader;

pub use loader::{
    CompanyInputsRecord, EmployeeInputsRecord, IndividualInputsRecord, InputsLoader,
    InputsLoaderError,
};
