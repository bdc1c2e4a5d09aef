//! Mock trade tape shown beside the chart.

use chrono::{NaiveTime, Timelike};
use farm_core::{RandomSource, RewardRange};
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::fmt;

/// Trades kept on the tape.
pub const TAPE_LEN: usize = 6;
/// Quantity per mock trade, half-open.
pub const QUANTITY_RANGE: RewardRange = RewardRange::new(50, 201);

const MS_PER_DAY: u64 = 86_400_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Side::Buy => "buy",
            Side::Sell => "sell",
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Trade {
    pub side: Side,
    pub quantity: u64,
    pub price: Decimal,
    pub time: NaiveTime,
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02} {:<4} {:>4} @ {:.2}",
            self.time.hour(),
            self.time.minute(),
            self.time.second(),
            self.side,
            self.quantity,
            self.price
        )
    }
}

/// Wall-clock label for a millisecond offset from midnight, wrapping daily.
pub fn time_of_day(ms: u64) -> NaiveTime {
    let secs = ((ms % MS_PER_DAY) / 1_000) as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, 0).unwrap_or(NaiveTime::MIN)
}

#[derive(Clone, Debug, Default)]
pub struct TradeTape {
    trades: VecDeque<Trade>,
}

impl TradeTape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Trade> {
        self.trades.iter()
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn clear(&mut self) {
        self.trades.clear();
    }

    pub fn push(&mut self, trade: Trade) {
        if self.trades.len() >= TAPE_LEN {
            self.trades.pop_back();
        }
        self.trades.push_front(trade);
    }

    /// Record a mock trade at `price`: random side and quantity.
    pub fn record_mock<R: RandomSource>(
        &mut self,
        rng: &mut R,
        price: Decimal,
        time: NaiveTime,
    ) -> &Trade {
        let side = if rng.flip() { Side::Buy } else { Side::Sell };
        let quantity = rng.draw(QUANTITY_RANGE);
        self.push(Trade {
            side,
            quantity,
            price,
            time,
        });
        &self.trades[0]
    }
}
