#![deny(warnings)]

//! Core domain models for Globe Farm.
//!
//! This crate defines the fixed region table, the game constants and the
//! session configuration shared by the economy, market and runtime crates,
//! plus the random-source seam used for reward and price draws.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

mod config;
mod random;

pub use config::{ConfigError, PriceTable, RewardRange, SessionConfig};
pub use random::{RandomSource, RngSource, SeededSource, SequenceSource};

/// Cash charged for moving to another region.
pub const TRAVEL_COST: u64 = 5_000;
/// Cash charged for planting seeds in the current region.
pub const PLANT_COST: u64 = 1_000;
/// Cash charged for a farm upgrade.
pub const UPGRADE_COST: u64 = 10_000;
/// Stars spent on a boost.
pub const BOOST_STAR_COST: u64 = 10;
/// Harvest reward bounds, half-open `[min, max)`.
pub const HARVEST_REWARD: RewardRange = RewardRange::new(2_000, 7_000);
/// Boost bonus bounds, half-open `[min, max)`.
pub const BOOST_BONUS: RewardRange = RewardRange::new(5_000, 15_000);
/// Cash balance at session start.
pub const INITIAL_CASH: u64 = 400_000;
/// Star balance at session start.
pub const INITIAL_STARS: u64 = 100;

/// A world area the player can farm in.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Region A, the starting region.
    #[default]
    Africa,
    /// Region B.
    Europe,
    /// Region C.
    Americas,
}

impl Region {
    /// Every region in table order.
    pub const ALL: [Region; 3] = [Region::Africa, Region::Europe, Region::Americas];

    /// Stable lowercase identifier, e.g. "europe".
    pub fn id(self) -> &'static str {
        match self {
            Region::Africa => "africa",
            Region::Europe => "europe",
            Region::Americas => "americas",
        }
    }

    /// Static metadata for this region.
    pub fn descriptor(self) -> &'static RegionDescriptor {
        &REGIONS[self as usize]
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.descriptor().display_name)
    }
}

impl FromStr for Region {
    type Err = ValidationError;

    /// Accepts the lowercase id or the letters a/b/c, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "africa" | "a" => Ok(Region::Africa),
            "europe" | "b" => Ok(Region::Europe),
            "americas" | "c" => Ok(Region::Americas),
            _ => Err(ValidationError::UnknownRegion(s.trim().to_string())),
        }
    }
}

/// Soil acidity range, inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhRange {
    pub min: f32,
    pub max: f32,
}

impl fmt::Display for PhRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.min, self.max)
    }
}

/// Descriptive, never-mutated metadata for a region.
#[derive(Debug, PartialEq, Serialize)]
pub struct RegionDescriptor {
    /// Region this row describes.
    pub region: Region,
    /// Human-readable name, e.g. "Americas".
    pub display_name: &'static str,
    /// Soil pH range.
    pub ph_range: PhRange,
    /// Soil classification label.
    pub soil_type: &'static str,
    /// Crops that suit the soil, best first.
    pub best_crops: &'static [&'static str],
    /// Display color as a hex string.
    pub color: &'static str,
}

static REGIONS: [RegionDescriptor; 3] = [
    RegionDescriptor {
        region: Region::Africa,
        display_name: "Africa",
        ph_range: PhRange { min: 5.0, max: 6.0 },
        soil_type: "Tropical Acidic",
        best_crops: &["Coffee", "Cocoa"],
        color: "#4a7a5a",
    },
    RegionDescriptor {
        region: Region::Europe,
        display_name: "Europe",
        ph_range: PhRange { min: 6.5, max: 7.0 },
        soil_type: "Temperate Neutral",
        best_crops: &["Wheat (Qamh)"],
        color: "#2a5038",
    },
    RegionDescriptor {
        region: Region::Americas,
        display_name: "Americas",
        ph_range: PhRange { min: 5.0, max: 6.0 },
        soil_type: "Tropical Acidic",
        best_crops: &["Coffee", "Sugarcane"],
        color: "#3a6b4a",
    },
];

/// The full region table in `Region::ALL` order.
pub fn regions() -> &'static [RegionDescriptor] {
    &REGIONS
}

/// Validation errors for configuration and user-supplied identifiers.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A reward range must contain at least one value.
    #[error("{name} range [{min}, {max}) is empty")]
    EmptyRange {
        name: &'static str,
        min: u64,
        max: u64,
    },
    /// Cash and star amounts must fit a signed ledger delta.
    #[error("{name} {value} does not fit a signed amount")]
    AmountTooLarge { name: &'static str, value: u64 },
    /// Region id not in the fixed table.
    #[error("unknown region: {0}")]
    UnknownRegion(String),
}
