use std::str::FromStr;

use greek_tax_core::RepositoryError;
use greek_tax_core::models::amount_from_f64;
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, TypeInfo, ValueRef};

/// Reads an amount column.
///
/// Amounts are written as decimal TEXT. INTEGER and REAL values from older or
/// hand-edited databases are accepted too; a REAL that is not finite is
/// rejected. NULL reads as zero.
pub fn get_decimal(
    row: &SqliteRow,
    column: &str,
) -> Result<Decimal, RepositoryError> {
    let value_ref = row
        .try_get_raw(column)
        .map_err(|e| RepositoryError::Database(format!("Column '{}' not found: {}", column, e)))?;

    if value_ref.is_null() {
        return Ok(Decimal::ZERO);
    }

    let type_name = value_ref.type_info().name().to_string();
    match type_name.as_str() {
        "TEXT" => {
            let text: String = row.try_get(column).map_err(|e| {
                RepositoryError::Database(format!("Failed to get TEXT from '{}': {}", column, e))
            })?;
            Decimal::from_str(text.trim()).map_err(|_| {
                RepositoryError::InvalidInput(format!(
                    "Column '{}' holds '{}', which is not a decimal",
                    column, text
                ))
            })
        }
        "INTEGER" => {
            let val: i64 = row.try_get(column).map_err(|e| {
                RepositoryError::Database(format!(
                    "Failed to get INTEGER from '{}': {}",
                    column, e
                ))
            })?;
            Ok(Decimal::from(val))
        }
        "REAL" => {
            let val: f64 = row.try_get(column).map_err(|e| {
                RepositoryError::Database(format!("Failed to get REAL from '{}': {}", column, e))
            })?;
            amount_from_f64(column, val).map_err(|e| RepositoryError::InvalidInput(e.to_string()))
        }
        _ => Err(RepositoryError::Database(format!(
            "Unexpected type '{}' for column '{}'",
            type_name, column
        ))),
    }
}

/// Encodes an amount for storage.
pub fn decimal_to_text(value: Decimal) -> String {
    value.normalize().to_string()
}
