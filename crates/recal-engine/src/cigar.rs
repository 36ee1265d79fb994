//! Cigar production: plants harvested for tobacco, tape cut for cloth.

use recal_core::cigar::{
    CIGARS_PER_HOUR, CLOTH_PER_CIGAR, CLOTH_PER_TAPE, PRICE_PER_CIGAR, TOBACCO_PER_CIGAR,
    TOBACCO_PER_PLANT,
};
use recal_core::{
    CigarBatchResult, CigarBatchSize, CigarCalculationResult, EngineError, CIGAR_COUNT_MAX,
    COUNT_MIN,
};
use rust_decimal::Decimal;
use tracing::debug;

use crate::whole_units;

const MINUTES_PER_HOUR: Decimal = Decimal::from_parts(60, 0, 0, false, 0);
const SECONDS_PER_HOUR: Decimal = Decimal::from_parts(3600, 0, 0, false, 0);

/// Computes cigar revenue, production time and input requirements.
///
/// Unlike the locker calculator this one validates its own bound: counts
/// outside 1..=10000 are rejected.
#[derive(Clone, Copy, Debug, Default)]
pub struct CigarProductionCalculator;

impl CigarProductionCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Full breakdown for `cigar_count` cigars.
    pub fn calculate_cigars(
        &self,
        cigar_count: i64,
    ) -> Result<CigarCalculationResult, EngineError> {
        let count = u32::try_from(cigar_count)
            .ok()
            .filter(|c| (COUNT_MIN..=CIGAR_COUNT_MAX).contains(c))
            .ok_or(EngineError::CigarCountOutOfRange(cigar_count))?;
        let cigars = Decimal::from(count);

        let production_hours = cigars / Decimal::from(CIGARS_PER_HOUR);

        let tobacco_needed = u64::from(count) * TOBACCO_PER_CIGAR;
        let cloth_needed = u64::from(count) * CLOTH_PER_CIGAR;
        let (plants_needed, tobacco_leftover) = whole_units(tobacco_needed, TOBACCO_PER_PLANT);
        let (tape_needed, cloth_leftover) = whole_units(cloth_needed, CLOTH_PER_TAPE);

        let revenue_per_hour = Decimal::from(CIGARS_PER_HOUR) * PRICE_PER_CIGAR;
        let (plants_per_hour, tape_per_hour) = hourly_inputs();

        debug!(count, plants_needed, tape_needed, "calculated cigar production");

        Ok(CigarCalculationResult {
            cigar_count: count,
            total_revenue: cigars * PRICE_PER_CIGAR,
            revenue_per_cigar: PRICE_PER_CIGAR,
            production_hours,
            production_minutes: production_hours * MINUTES_PER_HOUR,
            production_seconds: production_hours * SECONDS_PER_HOUR,
            tobacco_needed,
            cloth_needed,
            plants_needed_exact: Decimal::from(tobacco_needed) / Decimal::from(TOBACCO_PER_PLANT),
            tape_needed_exact: Decimal::from(cloth_needed) / Decimal::from(CLOTH_PER_TAPE),
            plants_needed,
            tape_needed,
            tobacco_leftover,
            cloth_leftover,
            cigars_per_hour: CIGARS_PER_HOUR,
            revenue_per_hour,
            revenue_per_minute: revenue_per_hour / MINUTES_PER_HOUR,
            revenue_per_second: revenue_per_hour / SECONDS_PER_HOUR,
            plants_per_hour,
            tape_per_hour,
            cost_per_cigar: Decimal::ZERO,
            profit_per_cigar: PRICE_PER_CIGAR,
            profit_margin: Decimal::ONE_HUNDRED,
        })
    }

    /// Revenue and whole-unit inputs for a named preset.
    pub fn calculate_batch(&self, batch_size: CigarBatchSize) -> CigarBatchResult {
        let cigar_count = batch_size.cigar_count();
        let (plants_needed, _) =
            whole_units(u64::from(cigar_count) * TOBACCO_PER_CIGAR, TOBACCO_PER_PLANT);
        let (tape_needed, _) =
            whole_units(u64::from(cigar_count) * CLOTH_PER_CIGAR, CLOTH_PER_TAPE);
        CigarBatchResult {
            batch_size,
            cigar_count,
            revenue: Decimal::from(cigar_count) * PRICE_PER_CIGAR,
            plants_needed,
            tape_needed,
        }
    }
}

/// Plants and tape consumed by one hour of production.
fn hourly_inputs() -> (u64, u64) {
    let per_hour = u64::from(CIGARS_PER_HOUR);
    let (plants, _) = whole_units(per_hour * TOBACCO_PER_CIGAR, TOBACCO_PER_PLANT);
    let (tape, _) = whole_units(per_hour * CLOTH_PER_CIGAR, CLOTH_PER_TAPE);
    (plants, tape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_out_of_range_counts() {
        let calc = CigarProductionCalculator::new();
        for bad in [0, -1, 10_001, i64::MAX, i64::MIN] {
            assert_eq!(
                calc.calculate_cigars(bad),
                Err(EngineError::CigarCountOutOfRange(bad))
            );
        }
    }

    #[test]
    fn bounds_are_inclusive() {
        let calc = CigarProductionCalculator;
        assert!(calc.calculate_cigars(1).is_ok());
        let r = calc.calculate_cigars(10_000).unwrap();
        assert_eq!(r.cigar_count, 10_000);
        assert_eq!(r.total_revenue, Decimal::new(1_000_000, 0));
    }

    #[test]
    fn one_hour_of_production() {
        let r = CigarProductionCalculator.calculate_cigars(300).unwrap();
        assert_eq!(r.plants_needed, 100);
        assert_eq!(r.tape_needed, 200);
        assert_eq!(r.tobacco_leftover, 0);
        assert_eq!(r.cloth_leftover, 0);
        assert_eq!(r.total_revenue, Decimal::new(30_000, 0));
        assert_eq!(r.production_hours, Decimal::ONE);
        assert_eq!(r.production_minutes, Decimal::new(60, 0));
        assert_eq!(r.production_seconds, Decimal::new(3600, 0));
        assert_eq!(r.plants_needed_exact, Decimal::new(100, 0));
        assert_eq!(r.tape_needed_exact, Decimal::new(200, 0));
    }

    #[test]
    fn single_cigar_leaves_leftovers() {
        let r = CigarProductionCalculator.calculate_cigars(1).unwrap();
        assert_eq!(r.tobacco_needed, 2);
        assert_eq!(r.cloth_needed, 2);
        assert_eq!(r.plants_needed, 1);
        assert_eq!(r.tobacco_leftover, 4);
        assert_eq!(r.tape_needed, 1);
        assert_eq!(r.cloth_leftover, 1);
        assert!(r.plants_needed_exact < Decimal::ONE);
        assert!(r.tape_needed_exact < Decimal::ONE);
        assert_eq!(r.total_revenue, Decimal::new(100, 0));
    }

    #[test]
    fn reference_rates_ignore_count() {
        let a = CigarProductionCalculator.calculate_cigars(7).unwrap();
        let b = CigarProductionCalculator.calculate_cigars(9_999).unwrap();
        for r in [&a, &b] {
            assert_eq!(r.cigars_per_hour, 300);
            assert_eq!(r.revenue_per_hour, Decimal::new(30_000, 0));
            assert_eq!(r.revenue_per_minute, Decimal::new(500, 0));
            assert_eq!(r.revenue_per_second, Decimal::new(30_000, 0) / Decimal::new(3600, 0));
            assert_eq!(r.plants_per_hour, 100);
            assert_eq!(r.tape_per_hour, 200);
            assert_eq!(r.cost_per_cigar, Decimal::ZERO);
            assert_eq!(r.profit_per_cigar, Decimal::new(100, 0));
            assert_eq!(r.profit_margin, Decimal::new(100, 0));
        }
    }

    #[test]
    fn batch_presets() {
        let calc = CigarProductionCalculator;
        let ten = calc.calculate_batch(CigarBatchSize::Ten);
        assert_eq!(ten.cigar_count, 10);
        assert_eq!(ten.revenue, Decimal::new(1000, 0));
        assert_eq!(ten.plants_needed, 4); // ceil(20 / 6)
        assert_eq!(ten.tape_needed, 7); // ceil(20 / 3)

        let hundred = calc.calculate_batch(CigarBatchSize::Hundred);
        assert_eq!(hundred.plants_needed, 34);
        assert_eq!(hundred.tape_needed, 67);

        let hourly = calc.calculate_batch(CigarBatchSize::Hourly);
        assert_eq!(hourly.cigar_count, 300);
        assert_eq!(hourly.plants_needed, 100);
        assert_eq!(hourly.tape_needed, 200);

        let fallback = calc.calculate_batch(CigarBatchSize::Unrecognized);
        assert_eq!(fallback.cigar_count, 1);
        assert_eq!(fallback.plants_needed, 1);
        assert_eq!(fallback.tape_needed, 1);
    }

    proptest! {
        #[test]
        fn leftovers_match_rounding(n in 1i64..=10_000) {
            let r = CigarProductionCalculator.calculate_cigars(n).unwrap();
            prop_assert_eq!(r.tobacco_leftover, r.plants_needed * 6 - r.tobacco_needed);
            prop_assert_eq!(r.cloth_leftover, r.tape_needed * 3 - r.cloth_needed);
            prop_assert!(r.tobacco_leftover < 6);
            prop_assert!(r.cloth_leftover < 3);
            prop_assert_eq!(Decimal::from(r.plants_needed), r.plants_needed_exact.ceil());
            prop_assert_eq!(Decimal::from(r.tape_needed), r.tape_needed_exact.ceil());
            prop_assert_eq!(r.tobacco_leftover == 0, r.plants_needed_exact.fract().is_zero());
        }

        #[test]
        fn batch_agrees_with_full_calculation(
            batch in prop_oneof![
                Just(CigarBatchSize::Ten),
                Just(CigarBatchSize::Hundred),
                Just(CigarBatchSize::Hourly),
            ]
        ) {
            let calc = CigarProductionCalculator;
            let b = calc.calculate_batch(batch);
            let full = calc.calculate_cigars(i64::from(b.cigar_count)).unwrap();
            prop_assert_eq!(b.revenue, full.total_revenue);
            prop_assert_eq!(b.plants_needed, full.plants_needed);
            prop_assert_eq!(b.tape_needed, full.tape_needed);
        }
    }
}
