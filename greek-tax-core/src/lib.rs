//! Greek business income tax engine.
//!
//! [`calculations`] holds the pure formula engine, [`models`] the input
//! records it consumes, and [`db`] the storage seam implemented by backend
//! crates.

pub mod calculations;
pub mod db;
pub mod models;

pub use db::repository::{OptionalRecord, RepositoryError, TaxRepository};
pub use models::*;
