//! Presumptive minimum income derived from lifestyle indicators.
//!
//! The figure is a floor on taxable income, not an addition to it: scenario
//! calculators compare it with the declared result and tax the larger one.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::calculations::common::{max, round_half_up};
use crate::models::DeemedTaxationFactors;

/// Per square metre of an owned main residence.
pub const OWNED_HOUSE_RATE: Decimal = dec!(40);
/// Per square metre of a rented main residence.
pub const RENTED_HOUSE_RATE: Decimal = dec!(200);
pub const VEHICLE_RATE: Decimal = dec!(250);
pub const VEHICLE_UPLIFT: Decimal = dec!(1.15);
pub const POOL_AMOUNT: Decimal = dec!(3000);
/// Per square metre of the main residence when a child attends private school.
pub const PRIVATE_SCHOOL_RATE: Decimal = dec!(100);
pub const DOMESTIC_WORKER_AMOUNT: Decimal = dec!(3000);
pub const DEPENDENT_REDUCTION: Decimal = dec!(500);

/// Computes the deemed taxation for a set of indicators.
///
/// Components are additive and each is rounded to cents:
///
/// - house: area × 40 if owned, area × 200 if rented
/// - vehicle: displacement × 250 × 1.15
/// - pool: 3 000
/// - private school: area × 100
/// - domestic worker: 3 000
/// - minus 500 per dependent
///
/// The total is floored at zero. Area and displacement terms only count when
/// the indicator is positive.
///
/// Note: the private-school term scales with the *house area*, not with the
/// number of children. This mirrors the reference form exactly and is likely
/// a modelling shortcut there; without a house it contributes nothing.
///
/// ```
/// use rust_decimal_macros::dec;
/// use greek_tax_core::DeemedTaxationFactors;
/// use greek_tax_core::calculations::deemed_taxation;
///
/// let factors = DeemedTaxationFactors {
///     house_area: dec!(100),
///     house_owned: true,
///     dependents: 2,
///     ..Default::default()
/// };
/// assert_eq!(deemed_taxation(&factors), dec!(3000));
/// ```
pub fn deemed_taxation(factors: &DeemedTaxationFactors) -> Decimal {
    let mut total = Decimal::ZERO;

    if factors.house_area > Decimal::ZERO {
        let rate = if factors.house_owned {
            OWNED_HOUSE_RATE
        } else {
            RENTED_HOUSE_RATE
        };
        total += round_half_up(factors.house_area * rate);
    }

    if factors.vehicle_displacement > Decimal::ZERO {
        total += round_half_up(factors.vehicle_displacement * VEHICLE_RATE * VEHICLE_UPLIFT);
    }

    if factors.has_pool {
        total += POOL_AMOUNT;
    }

    if factors.private_school && factors.house_area > Decimal::ZERO {
        total += round_half_up(factors.house_area * PRIVATE_SCHOOL_RATE);
    }

    if factors.domestic_worker {
        total += DOMESTIC_WORKER_AMOUNT;
    }

    total -= DEPENDENT_REDUCTION * Decimal::from(factors.dependents);

    let deemed = max(Decimal::ZERO, total);
    debug!(raw = %total, deemed = %deemed, "deemed taxation");
    deemed
}
