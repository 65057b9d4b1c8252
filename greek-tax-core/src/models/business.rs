use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Business {
    pub id: String,
    pub business_name: String,
    pub activity: String,
    pub address: String,
    /// Greek tax identification number (AFM).
    pub tax_id: String,
    pub last_calculation_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// For creating new businesses (no timestamps)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBusiness {
    pub id: String,
    pub business_name: String,
    pub activity: String,
    pub address: String,
    pub tax_id: String,
}

/// Stored inputs of one kind for a single `(business_id, fiscal_year)` key.
///
/// Only inputs are persisted; results are recomputed from them on every read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalYearRecord<T> {
    pub business_id: String,
    pub fiscal_year: i32,
    pub inputs: T,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
