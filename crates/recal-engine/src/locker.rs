//! Wall locker materials: cans broken down for scrap, cage lights for wire.

use recal_core::locker::{
    CAGE_LIGHT_COST, CAN_COST, METAL_BARS_PER_CAGE_LIGHT, PRICE_FACTORS, SCRAP_PER_CAN,
    SCRAP_PER_LOCKER, WIRE_PER_CAGE_LIGHT, WIRE_PER_LOCKER,
};
use recal_core::{CraftingResult, EngineError, ProfitCalculation};
use rust_decimal::Decimal;
use tracing::debug;

use crate::whole_units;

/// Computes locker material requirements and pricing strategies.
///
/// The locker count range (1..=1000) is the caller's responsibility; only a
/// zero count is rejected because cost per locker is undefined there.
#[derive(Clone, Copy, Debug, Default)]
pub struct LockerMaterialCalculator;

impl LockerMaterialCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Materials, leftovers and costs for `locker_count` lockers.
    ///
    /// Example:
    /// let r = LockerMaterialCalculator.calculate_materials(1).unwrap();
    /// assert_eq!(r.cans_needed, 10);
    /// assert_eq!(r.total_cost, Decimal::new(866, 0));
    pub fn calculate_materials(&self, locker_count: u32) -> Result<CraftingResult, EngineError> {
        if locker_count == 0 {
            return Err(EngineError::ZeroLockerCount);
        }
        let lockers = u64::from(locker_count);
        let total_scrap_needed = SCRAP_PER_LOCKER * lockers;
        let total_wire_needed = WIRE_PER_LOCKER * lockers;

        let (cans_needed, scrap_leftover) = whole_units(total_scrap_needed, SCRAP_PER_CAN);
        // Exact: WIRE_PER_LOCKER is a multiple of WIRE_PER_CAGE_LIGHT.
        let (cage_lights_needed, wire_leftover) =
            whole_units(total_wire_needed, WIRE_PER_CAGE_LIGHT);

        let total_cost = Decimal::from(cans_needed) * CAN_COST
            + Decimal::from(cage_lights_needed) * CAGE_LIGHT_COST;
        let cost_per_locker = total_cost / Decimal::from(locker_count);

        debug!(
            locker_count,
            cans_needed, cage_lights_needed, %total_cost, "calculated locker materials"
        );

        Ok(CraftingResult {
            cans_needed,
            cage_lights_needed,
            scrap_produced: cans_needed * SCRAP_PER_CAN,
            scrap_leftover,
            wire_produced: cage_lights_needed * WIRE_PER_CAGE_LIGHT,
            wire_leftover,
            metal_bars_produced: cage_lights_needed * METAL_BARS_PER_CAGE_LIGHT,
            total_cost,
            cost_per_locker,
        })
    }

    /// Four selling strategies at 100%, 85%, 75% and 65% of `market_price`.
    ///
    /// Order is fixed and never sorted by profit. Fails when `market_price`
    /// is not strictly positive, since the margin divides by the selling price.
    pub fn calculate_profit_strategies(
        &self,
        locker_count: u32,
        cost_per_locker: Decimal,
        market_price: Decimal,
    ) -> Result<[ProfitCalculation; 4], EngineError> {
        if market_price <= Decimal::ZERO {
            return Err(EngineError::InvalidMarketPrice(market_price));
        }
        let lockers = Decimal::from(locker_count);
        Ok(PRICE_FACTORS.map(|price_factor| {
            let selling_price = market_price * price_factor;
            let profit_per_locker = selling_price - cost_per_locker;
            ProfitCalculation {
                price_factor,
                selling_price,
                profit_per_locker,
                profit_margin: profit_per_locker / selling_price * Decimal::ONE_HUNDRED,
                total_revenue: selling_price * lockers,
                total_profit: profit_per_locker * lockers,
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn single_locker_end_to_end() {
        let r = LockerMaterialCalculator.calculate_materials(1).unwrap();
        assert_eq!(r.cans_needed, 10);
        assert_eq!(r.scrap_produced, 40);
        assert_eq!(r.scrap_leftover, 2);
        assert_eq!(r.cage_lights_needed, 4);
        assert_eq!(r.wire_produced, 8);
        assert_eq!(r.wire_leftover, 0);
        assert_eq!(r.metal_bars_produced, 8);
        assert_eq!(r.total_cost, Decimal::new(866, 0));
        assert_eq!(r.cost_per_locker, Decimal::new(866, 0));
    }

    #[test]
    fn even_locker_count_has_no_scrap_leftover() {
        // 2 * 38 = 76 = 19 cans exactly
        let r = LockerMaterialCalculator.calculate_materials(2).unwrap();
        assert_eq!(r.cans_needed, 19);
        assert_eq!(r.scrap_leftover, 0);
        assert_eq!(r.cage_lights_needed, 8);
        assert_eq!(r.total_cost, Decimal::new(19 * 59 + 8 * 69, 0));
        assert_eq!(r.cost_per_locker, Decimal::new(8365, 1));
    }

    #[test]
    fn range_is_not_validated_here() {
        assert!(LockerMaterialCalculator.calculate_materials(1001).is_ok());
        assert_eq!(
            LockerMaterialCalculator.calculate_materials(0),
            Err(EngineError::ZeroLockerCount)
        );
    }

    #[test]
    fn strategies_keep_fixed_order() {
        let calc = LockerMaterialCalculator::new();
        let s = calc
            .calculate_profit_strategies(10, Decimal::new(866, 0), Decimal::new(1000, 0))
            .unwrap();
        let prices: Vec<Decimal> = s.iter().map(|p| p.selling_price).collect();
        assert_eq!(
            prices,
            vec![
                Decimal::new(1000, 0),
                Decimal::new(850, 0),
                Decimal::new(750, 0),
                Decimal::new(650, 0)
            ]
        );
        assert_eq!(s[0].profit_per_locker, Decimal::new(134, 0));
        assert_eq!(s[0].profit_margin, Decimal::new(134, 1));
        assert_eq!(s[0].total_revenue, Decimal::new(10_000, 0));
        assert_eq!(s[0].total_profit, Decimal::new(1340, 0));
        // Selling below cost is reported, not hidden.
        assert_eq!(s[3].profit_per_locker, Decimal::new(-216, 0));
        assert!(s[3].total_profit < Decimal::ZERO);
    }

    #[test]
    fn zero_market_price_is_rejected() {
        let calc = LockerMaterialCalculator;
        assert_eq!(
            calc.calculate_profit_strategies(1, Decimal::ONE, Decimal::ZERO),
            Err(EngineError::InvalidMarketPrice(Decimal::ZERO))
        );
        assert!(calc
            .calculate_profit_strategies(1, Decimal::ONE, Decimal::new(-5, 0))
            .is_err());
    }

    proptest! {
        #[test]
        fn cans_cover_scrap(n in 1u32..=1000) {
            let r = LockerMaterialCalculator.calculate_materials(n).unwrap();
            let scrap = 38 * u64::from(n);
            prop_assert_eq!(r.cans_needed, scrap.div_ceil(4));
            prop_assert_eq!(r.scrap_leftover, r.cans_needed * 4 - scrap);
            prop_assert!(r.scrap_leftover < 4);
        }

        #[test]
        fn wire_is_always_exact(n in 1u32..=1000) {
            let r = LockerMaterialCalculator.calculate_materials(n).unwrap();
            prop_assert_eq!(r.wire_leftover, 0);
            prop_assert_eq!(r.wire_produced, 8 * u64::from(n));
        }

        #[test]
        fn unit_cost_reconstructs_total(n in 1u32..=1000) {
            let r = LockerMaterialCalculator.calculate_materials(n).unwrap();
            let diff = (r.cost_per_locker * Decimal::from(n) - r.total_cost).abs();
            prop_assert!(diff < Decimal::new(1, 20));
        }

        #[test]
        fn strategies_never_reordered(cost in 0i64..100_000, price in 1i64..100_000) {
            let s = LockerMaterialCalculator
                .calculate_profit_strategies(3, Decimal::new(cost, 2), Decimal::new(price, 2))
                .unwrap();
            prop_assert_eq!(s.len(), 4);
            for (p, f) in s.iter().zip(PRICE_FACTORS) {
                prop_assert_eq!(p.price_factor, f);
            }
            prop_assert!(s.windows(2).all(|w| w[0].selling_price > w[1].selling_price));
        }
    }
}
