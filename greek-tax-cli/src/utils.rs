use regex::Regex;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaxIdError {
    #[error("tax id must be exactly 9 digits, got '{0}'")]
    Malformed(String),

    #[error("tax id pattern failed to compile: {0}")]
    Pattern(String),
}

/// Checks a Greek tax identification number (AFM): exactly nine ASCII digits
/// once surrounding whitespace is removed. Returns the trimmed value.
pub fn validate_tax_id(tax_id: &str) -> Result<String, TaxIdError> {
    let pattern = Regex::new(r"^[0-9]{9}$").map_err(|e| TaxIdError::Pattern(e.to_string()))?;
    let trimmed = tax_id.trim();
    if pattern.is_match(trimmed) {
        Ok(trimmed.to_string())
    } else {
        Err(TaxIdError::Malformed(tax_id.to_string()))
    }
}

/// Fresh identifier for a business.
pub fn new_business_id() -> String {
    Uuid::new_v4().to_string()
}
