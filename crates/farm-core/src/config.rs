//! Session configuration: starting balances, prices and reward ranges.

use crate::{
    Region, ValidationError, BOOST_BONUS, BOOST_STAR_COST, HARVEST_REWARD, INITIAL_CASH,
    INITIAL_STARS, PLANT_COST, TRAVEL_COST, UPGRADE_COST,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Half-open integer range `[min, max)` for random rewards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardRange {
    pub min: u64,
    pub max: u64,
}

impl RewardRange {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// Number of distinct values in the range.
    pub fn span(&self) -> u64 {
        self.max.saturating_sub(self.min)
    }

    pub fn contains(&self, value: u64) -> bool {
        (self.min..self.max).contains(&value)
    }

    /// Map a unit draw in [0, 1) to `min + floor(unit * span)`.
    ///
    /// Out-of-range or non-finite units are clamped so the result always
    /// stays inside `[min, max)`. An empty range yields `min`.
    pub fn pick(&self, unit: f64) -> u64 {
        let span = self.span();
        if span == 0 {
            return self.min;
        }
        let unit = if unit.is_finite() { unit.max(0.0) } else { 0.0 };
        let offset = (unit * span as f64).floor() as u64;
        self.min + offset.min(span - 1)
    }

    fn check(&self, name: &'static str) -> Result<(), ValidationError> {
        if self.span() == 0 {
            return Err(ValidationError::EmptyRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Costs and reward ranges for the five economy actions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceTable {
    pub travel_cost: u64,
    pub plant_cost: u64,
    pub upgrade_cost: u64,
    pub boost_star_cost: u64,
    pub harvest_reward: RewardRange,
    pub boost_bonus: RewardRange,
}

impl Default for PriceTable {
    fn default() -> Self {
        Self {
            travel_cost: TRAVEL_COST,
            plant_cost: PLANT_COST,
            upgrade_cost: UPGRADE_COST,
            boost_star_cost: BOOST_STAR_COST,
            harvest_reward: HARVEST_REWARD,
            boost_bonus: BOOST_BONUS,
        }
    }
}

/// Everything needed to start a session. Missing YAML keys fall back to
/// the game defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub initial_cash: u64,
    pub initial_stars: u64,
    pub start_region: Region,
    /// Seed for reward draws; OS entropy when absent.
    pub rng_seed: Option<u64>,
    pub prices: PriceTable,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_cash: INITIAL_CASH,
            initial_stars: INITIAL_STARS,
            start_region: Region::default(),
            rng_seed: None,
            prices: PriceTable::default(),
        }
    }
}

/// Errors raised while loading a session configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("yaml error: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(#[from] ValidationError),
}

impl SessionConfig {
    /// Parse and validate YAML text.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to a map.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let cfg: SessionConfig = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse and validate a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Check that both reward ranges are non-empty and that every amount
    /// fits a signed ledger delta.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let p = &self.prices;
        p.harvest_reward.check("harvest_reward")?;
        p.boost_bonus.check("boost_bonus")?;
        let amounts = [
            ("initial_cash", self.initial_cash),
            ("initial_stars", self.initial_stars),
            ("travel_cost", p.travel_cost),
            ("plant_cost", p.plant_cost),
            ("upgrade_cost", p.upgrade_cost),
            ("boost_star_cost", p.boost_star_cost),
            ("harvest_reward", p.harvest_reward.max),
            ("boost_bonus", p.boost_bonus.max),
        ];
        for (name, value) in amounts {
            if value > i64::MAX as u64 {
                return Err(ValidationError::AmountTooLarge { name, value });
            }
        }
        Ok(())
    }
}
