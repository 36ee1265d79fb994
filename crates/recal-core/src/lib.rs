#![deny(warnings)]

//! Core recipe constants and result records for ReCal.
//!
//! This crate defines the fixed crafting recipes of the game economy and the
//! serializable records produced by the calculators in `recal-engine`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Wall locker recipe.
pub mod locker {
    use rust_decimal::Decimal;

    /// Scrap consumed by one locker.
    pub const SCRAP_PER_LOCKER: u64 = 38;
    /// Wire consumed by one locker.
    pub const WIRE_PER_LOCKER: u64 = 8;
    /// Scrap yielded by breaking down one can.
    pub const SCRAP_PER_CAN: u64 = 4;
    /// Purchase price of one can.
    pub const CAN_COST: Decimal = Decimal::from_parts(59, 0, 0, false, 0);
    /// Wire yielded by breaking down one cage light.
    pub const WIRE_PER_CAGE_LIGHT: u64 = 2;
    /// Metal bars yielded alongside the wire of one cage light.
    pub const METAL_BARS_PER_CAGE_LIGHT: u64 = 2;
    /// Purchase price of one cage light.
    pub const CAGE_LIGHT_COST: Decimal = Decimal::from_parts(69, 0, 0, false, 0);

    /// Selling price multipliers for the profit strategies, in report order.
    pub const PRICE_FACTORS: [Decimal; 4] = [
        Decimal::from_parts(100, 0, 0, false, 2),
        Decimal::from_parts(85, 0, 0, false, 2),
        Decimal::from_parts(75, 0, 0, false, 2),
        Decimal::from_parts(65, 0, 0, false, 2),
    ];
}

/// Cigar recipe.
pub mod cigar {
    use rust_decimal::Decimal;

    /// Sale price of one cigar.
    pub const PRICE_PER_CIGAR: Decimal = Decimal::from_parts(100, 0, 0, false, 0);
    /// Cigars rolled per hour of production.
    pub const CIGARS_PER_HOUR: u32 = 300;
    pub const TOBACCO_PER_CIGAR: u64 = 2;
    pub const CLOTH_PER_CIGAR: u64 = 2;
    /// Tobacco harvested from one plant.
    pub const TOBACCO_PER_PLANT: u64 = 6;
    /// Cloth obtained from one roll of tape.
    pub const CLOTH_PER_TAPE: u64 = 3;
}

/// Smallest count either calculator accepts.
pub const COUNT_MIN: u32 = 1;
/// Largest locker count the input collaborator accepts.
pub const LOCKER_COUNT_MAX: u32 = 1000;
/// Largest cigar count; enforced by the cigar calculator itself.
pub const CIGAR_COUNT_MAX: u32 = 10_000;

/// Materials and costs required to craft a number of wall lockers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftingResult {
    /// Cans to buy and break down for scrap.
    pub cans_needed: u64,
    /// Cage lights to buy and break down for wire.
    pub cage_lights_needed: u64,
    /// Scrap obtained from the cans.
    pub scrap_produced: u64,
    /// Scrap remaining after crafting, in [0, 3].
    pub scrap_leftover: u64,
    /// Wire obtained from the cage lights.
    pub wire_produced: u64,
    /// Wire remaining after crafting; always 0 for this recipe.
    pub wire_leftover: u64,
    /// Metal bars obtained as a by-product of the cage lights.
    pub metal_bars_produced: u64,
    /// Cost of all cans and cage lights.
    pub total_cost: Decimal,
    /// Total cost divided by locker count, unrounded.
    pub cost_per_locker: Decimal,
}

/// One pricing strategy for selling crafted lockers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitCalculation {
    /// Multiplier applied to the market price (1.00, 0.85, 0.75 or 0.65).
    pub price_factor: Decimal,
    pub selling_price: Decimal,
    pub profit_per_locker: Decimal,
    /// Profit as a percentage of the selling price.
    pub profit_margin: Decimal,
    pub total_revenue: Decimal,
    pub total_profit: Decimal,
}

/// Full production breakdown for a number of cigars.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CigarCalculationResult {
    pub cigar_count: u32,
    pub total_revenue: Decimal,
    pub revenue_per_cigar: Decimal,
    /// Production time in hours (fractional).
    pub production_hours: Decimal,
    pub production_minutes: Decimal,
    pub production_seconds: Decimal,

    /// Tobacco consumed, exact.
    pub tobacco_needed: u64,
    /// Cloth consumed, exact.
    pub cloth_needed: u64,
    /// Plants required before rounding.
    pub plants_needed_exact: Decimal,
    /// Tape required before rounding.
    pub tape_needed_exact: Decimal,
    /// Whole plants to harvest.
    pub plants_needed: u64,
    /// Whole rolls of tape to use.
    pub tape_needed: u64,

    pub tobacco_leftover: u64,
    pub cloth_leftover: u64,

    // Reference rates, independent of the requested count.
    pub cigars_per_hour: u32,
    pub revenue_per_hour: Decimal,
    pub revenue_per_minute: Decimal,
    pub revenue_per_second: Decimal,
    pub plants_per_hour: u64,
    pub tape_per_hour: u64,

    /// Always zero: the model has no material cost input.
    pub cost_per_cigar: Decimal,
    pub profit_per_cigar: Decimal,
    /// Percentage; always 100.
    pub profit_margin: Decimal,
}

/// Named cigar batch presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CigarBatchSize {
    /// Ten cigars.
    Ten,
    /// One hundred cigars.
    Hundred,
    /// One hour of production.
    Hourly,
    /// Any preset name this version does not know; treated as a single cigar.
    #[serde(other)]
    Unrecognized,
}

impl CigarBatchSize {
    /// Fixed cigar count of the preset.
    pub fn cigar_count(self) -> u32 {
        match self {
            CigarBatchSize::Ten => 10,
            CigarBatchSize::Hundred => 100,
            CigarBatchSize::Hourly => cigar::CIGARS_PER_HOUR,
            CigarBatchSize::Unrecognized => 1,
        }
    }
}

impl fmt::Display for CigarBatchSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CigarBatchSize::Ten => "ten",
            CigarBatchSize::Hundred => "hundred",
            CigarBatchSize::Hourly => "hourly",
            CigarBatchSize::Unrecognized => "unrecognized",
        };
        f.write_str(name)
    }
}

impl FromStr for CigarBatchSize {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ten" | "10" => Ok(CigarBatchSize::Ten),
            "hundred" | "100" => Ok(CigarBatchSize::Hundred),
            "hourly" | "hour" | "300" => Ok(CigarBatchSize::Hourly),
            _ => Err(EngineError::UnknownBatch(s.to_string())),
        }
    }
}

/// Revenue and whole-unit inputs for a batch preset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CigarBatchResult {
    pub batch_size: CigarBatchSize,
    pub cigar_count: u32,
    pub revenue: Decimal,
    pub plants_needed: u64,
    pub tape_needed: u64,
}

/// Errors produced by the calculators.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    /// Cigar count outside [1, 10000].
    #[error("cigar count must be between 1 and 10000, got {0}")]
    CigarCountOutOfRange(i64),
    /// Cost per locker is undefined for zero lockers.
    #[error("locker count must be greater than zero")]
    ZeroLockerCount,
    /// Market price must be strictly positive for margins to be defined.
    #[error("market price must be > 0, got {0}")]
    InvalidMarketPrice(Decimal),
    /// Batch preset name not recognised.
    #[error("unknown batch size: {0}")]
    UnknownBatch(String),
}
