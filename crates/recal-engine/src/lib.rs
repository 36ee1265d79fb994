#![deny(warnings)]

//! Calculation engine for ReCal.
//!
//! Two stateless calculators turn a desired output count into raw-material
//! requirements, leftovers and money figures:
//! - [`LockerMaterialCalculator`] for wall lockers (cans and cage lights)
//! - [`CigarProductionCalculator`] for cigars (plants and tape)
//!
//! Both share the same rounding model: a fractional requirement is rounded up
//! to whole production units and the surplus is reported as leftover.

mod cigar;
mod locker;

pub use cigar::CigarProductionCalculator;
pub use locker::LockerMaterialCalculator;
pub use recal_core::{
    CigarBatchResult, CigarBatchSize, CigarCalculationResult, CraftingResult, EngineError,
    ProfitCalculation,
};

/// Round `required` up to whole units of `per_unit` each.
///
/// Returns `(units, leftover)` where `leftover = units * per_unit - required`,
/// so `0 <= leftover < per_unit` and `leftover == 0` iff the division is exact.
/// `per_unit` must be non-zero; every recipe constant is.
pub fn whole_units(required: u64, per_unit: u64) -> (u64, u64) {
    let units = required.div_ceil(per_unit);
    (units, units * per_unit - required)
}
