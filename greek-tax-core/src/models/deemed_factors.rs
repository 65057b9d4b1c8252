use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifestyle indicators used to derive the presumptive minimum income.
///
/// These never form a tax base on their own; they only feed
/// [`crate::calculations::deemed_taxation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeemedTaxationFactors {
    /// Main residence floor area in square metres.
    pub house_area: Decimal,
    pub house_owned: bool,
    /// Vehicle engine displacement, as entered on the return.
    pub vehicle_displacement: Decimal,
    pub has_pool: bool,
    pub private_school: bool,
    pub domestic_worker: bool,
    pub dependents: u32,
}

impl Default for DeemedTaxationFactors {
    /// An owned home with every other indicator absent.
    fn default() -> Self {
        Self {
            house_area: Decimal::ZERO,
            house_owned: true,
            vehicle_displacement: Decimal::ZERO,
            has_pool: false,
            private_school: false,
            domestic_worker: false,
            dependents: 0,
        }
    }
}
