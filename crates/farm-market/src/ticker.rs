//! Bounded random-walk price feed with a sliding price/volume window.

use crate::MarketError;
use farm_core::{RandomSource, RewardRange};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::VecDeque;

/// Opening price of every session: 42.50.
pub const BASE_PRICE: Decimal = Decimal::from_parts(4250, 0, 0, false, 2);
/// Lowest price the walk may reach.
pub const PRICE_FLOOR: Decimal = Decimal::from_parts(38, 0, 0, false, 0);
/// Highest price the walk may reach.
pub const PRICE_CEILING: Decimal = Decimal::from_parts(48, 0, 0, false, 0);
/// Points kept in the chart window.
pub const HISTORY_LEN: usize = 14;
/// Volume per point, half-open.
pub const VOLUME_RANGE: RewardRange = RewardRange::new(100, 500);

/// Upward bias of the history generator: steps are `(u - 0.48) * 2`.
const HISTORY_BIAS: f64 = 0.48;
const HISTORY_STEP: f64 = 2.0;
const TICK_STEP: f64 = 1.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PricePoint {
    /// Position on the chart's time axis.
    pub index: u64,
    pub price: Decimal,
    pub volume: u64,
}

fn to_decimal(x: f64) -> Result<Decimal, MarketError> {
    Decimal::from_f64(x).ok_or(MarketError::NonFinite)
}

fn clamp_price(p: Decimal) -> Decimal {
    p.clamp(PRICE_FLOOR, PRICE_CEILING)
}

fn cents(p: Decimal) -> Decimal {
    p.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Build a fresh chart window starting from `base`.
pub fn generate_history<R: RandomSource>(
    base: Decimal,
    rng: &mut R,
) -> Result<VecDeque<PricePoint>, MarketError> {
    let mut out = VecDeque::with_capacity(HISTORY_LEN);
    let mut p = base;
    for i in 0..HISTORY_LEN {
        let step = (rng.next_unit() - HISTORY_BIAS) * HISTORY_STEP;
        p = clamp_price(p + to_decimal(step)?);
        out.push_back(PricePoint {
            index: i as u64,
            price: cents(p),
            volume: rng.draw(VOLUME_RANGE),
        });
    }
    Ok(out)
}

#[derive(Clone, Debug)]
pub struct PriceTicker {
    price: Decimal,
    direction: Option<Direction>,
    history: VecDeque<PricePoint>,
}

impl PriceTicker {
    pub fn new<R: RandomSource>(rng: &mut R) -> Result<Self, MarketError> {
        Ok(Self {
            price: BASE_PRICE,
            direction: None,
            history: generate_history(BASE_PRICE, rng)?,
        })
    }

    /// Back to the opening price with a fresh window.
    pub fn reset<R: RandomSource>(&mut self, rng: &mut R) -> Result<(), MarketError> {
        *self = Self::new(rng)?;
        Ok(())
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    pub fn history(&self) -> impl Iterator<Item = &PricePoint> {
        self.history.iter()
    }

    pub fn clear_direction(&mut self) {
        self.direction = None;
    }

    /// One step of the walk: move by `(u - 0.5) * 1.2`, clamp, round to
    /// cents and slide the window.
    pub fn tick<R: RandomSource>(&mut self, rng: &mut R) -> Result<PricePoint, MarketError> {
        let change = (rng.next_unit() - 0.5) * TICK_STEP;
        let next = cents(clamp_price(self.price + to_decimal(change)?));
        self.direction = if change > 0.0 {
            Some(Direction::Up)
        } else if change < 0.0 {
            Some(Direction::Down)
        } else {
            None
        };
        self.price = next;

        let index = self.history.back().map_or(0, |p| p.index + 1);
        if self.history.len() >= HISTORY_LEN {
            self.history.pop_front();
        }
        let point = PricePoint {
            index,
            price: next,
            volume: rng.draw(VOLUME_RANGE),
        };
        self.history.push_back(point.clone());
        Ok(point)
    }
}
