//! TOML inputs files.
//!
//! ```toml
//! [individual]
//! net_turnover = 57788.06
//! purchases_goods_materials = -49496.09
//! previous_year_prepayment = "1902.32"
//!
//! [company]
//! net_turnover = 50000
//!
//! [employee]
//! employee_income = 15000
//!
//! [deemed]
//! house_area = 120
//! vehicle_displacement = 1600
//! ```
//!
//! Every section is optional and every amount defaults to zero. Amounts may
//! be written as integers, floats or strings. A `[deemed]` section derives the
//! individual business's `deemed_taxation`, so the two cannot both be given,
//! and it needs an `[individual]` section to apply to.

use std::path::{Path, PathBuf};

use greek_tax_core::calculations::{ScenarioInputs, deemed_taxation};
use greek_tax_core::models::{InvalidAmount, amount_from_f64, parse_amount};
use greek_tax_core::{CompanyInputs, DeemedTaxationFactors, EmployeeInputs, IndividualBusinessInputs};
use rust_decimal::Decimal;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use toml::{Table, Value};
use tracing::debug;

#[derive(Debug, Error)]
pub enum InputFileError {
    #[error("cannot read inputs file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown section [{0}]")]
    UnknownSection(String),

    #[error("[{section}] {message}")]
    InvalidSection { section: String, message: String },

    #[error(transparent)]
    InvalidAmount(#[from] InvalidAmount),

    #[error("deemed_taxation is given in [individual] and derived from [deemed]; keep one")]
    ConflictingDeemedTaxation,
}

/// The parsed contents of an inputs file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputFile {
    pub individual: Option<IndividualBusinessInputs>,
    pub company: Option<CompanyInputs>,
    pub employee: Option<EmployeeInputs>,
    pub deemed: Option<DeemedTaxationFactors>,
}

impl InputFile {
    pub fn load(path: &Path) -> Result<Self, InputFileError> {
        let text = std::fs::read_to_string(path).map_err(|source| InputFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, InputFileError> {
        let table: Table = toml::from_str(text)?;
        let mut file = InputFile::default();
        let mut explicit_deemed = false;

        for (name, value) in &table {
            let Value::Table(section) = value else {
                return Err(InputFileError::InvalidSection {
                    section: name.clone(),
                    message: format!("expected a table, found {}", value.type_str()),
                });
            };

            match name.as_str() {
                "individual" => {
                    explicit_deemed = section.contains_key("deemed_taxation");
                    file.individual = Some(amount_section(name, section)?);
                }
                "company" => file.company = Some(amount_section(name, section)?),
                "employee" => file.employee = Some(amount_section(name, section)?),
                "deemed" => file.deemed = Some(typed_section(name, section)?),
                other => return Err(InputFileError::UnknownSection(other.to_string())),
            }
        }

        if file.deemed.is_some() && file.individual.is_none() {
            return Err(InputFileError::InvalidSection {
                section: "deemed".to_string(),
                message: "only applies to an [individual] section, which is missing".to_string(),
            });
        }

        if let (Some(factors), Some(individual)) = (&file.deemed, file.individual.as_mut()) {
            if explicit_deemed {
                return Err(InputFileError::ConflictingDeemedTaxation);
            }
            individual.deemed_taxation = deemed_taxation(factors);
            debug!(deemed_taxation = %individual.deemed_taxation, "deemed taxation derived from factors");
        }

        Ok(file)
    }

    pub fn scenario_inputs(&self) -> ScenarioInputs {
        ScenarioInputs {
            individual: self.individual.clone(),
            company: self.company.clone(),
            employee: self.employee.clone(),
        }
    }
}

/// Keys a section may hold: those of the type's default value.
fn known_keys<T: Serialize + Default>(section: &str) -> Result<Table, InputFileError> {
    match Value::try_from(T::default()) {
        Ok(Value::Table(table)) => Ok(table),
        Ok(_) | Err(_) => Err(InputFileError::InvalidSection {
            section: section.to_string(),
            message: "cannot describe the expected fields".to_string(),
        }),
    }
}

fn check_keys<T: Serialize + Default>(
    name: &str,
    section: &Table,
) -> Result<(), InputFileError> {
    let known = known_keys::<T>(name)?;
    match section.keys().find(|key| !known.contains_key(*key)) {
        Some(key) => Err(InputFileError::InvalidSection {
            section: name.to_string(),
            message: format!("unknown field '{key}'"),
        }),
        None => Ok(()),
    }
}

fn deserialize_section<T: DeserializeOwned>(
    name: &str,
    table: Table,
) -> Result<T, InputFileError> {
    Value::Table(table)
        .try_into()
        .map_err(|e: toml::de::Error| InputFileError::InvalidSection {
            section: name.to_string(),
            message: e.message().to_string(),
        })
}

/// A section whose every field is an amount.
fn amount_section<T>(
    name: &str,
    section: &Table,
) -> Result<T, InputFileError>
where
    T: DeserializeOwned + Serialize + Default,
{
    check_keys::<T>(name, section)?;

    let mut normalized = Table::new();
    for (key, value) in section {
        let amount = match value {
            Value::Integer(i) => Decimal::from(*i),
            Value::Float(f) => amount_from_f64(key, *f)?,
            Value::String(s) => parse_amount(key, s)?,
            other => {
                return Err(InputFileError::InvalidSection {
                    section: name.to_string(),
                    message: format!("{key}: expected an amount, found {}", other.type_str()),
                });
            }
        };
        normalized.insert(key.clone(), Value::String(amount.to_string()));
    }

    deserialize_section(name, normalized)
}

fn typed_section<T>(
    name: &str,
    section: &Table,
) -> Result<T, InputFileError>
where
    T: DeserializeOwned + Serialize + Default,
{
    check_keys::<T>(name, section)?;
    for (key, value) in section {
        if let Value::Float(f) = value {
            amount_from_f64(key, *f)?;
        }
    }
    deserialize_section(name, section.clone())
}
