#![deny(warnings)]

//! Trading room mock feed for Globe Farm.
//!
//! Decorative only: the ticker is a clamped random walk, trades are
//! invented, and selling quotes proceeds without touching the economy.

use farm_core::{RandomSource, SeededSource};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info};

pub mod silo;
pub mod tape;
pub mod ticker;

pub use silo::{sample_silos, CropSilo, SellTicket};
pub use tape::{Side, Trade, TradeTape};
pub use ticker::{Direction, PricePoint, PriceTicker};

/// Delay between price updates while the room is open.
pub const TICK_INTERVAL_MS: u64 = 800;
/// How long a price move stays highlighted.
pub const FLICKER_MS: u64 = 400;
/// Tape clock at open: 10:31:44.
pub const TAPE_START_MS: u64 = 37_904_000;

#[derive(Debug, Error, PartialEq)]
pub enum MarketError {
    #[error("non-finite price step")]
    NonFinite,
    #[error("trading room is closed")]
    NotOpen,
    #[error("unknown silo: {0}")]
    UnknownSilo(String),
}

#[derive(Clone, Debug)]
struct OpenSilo {
    index: usize,
    ticket: SellTicket,
}

/// Full-screen trading view for one silo at a time.
#[derive(Clone, Debug)]
pub struct TradingRoom<R = SeededSource> {
    silos: Vec<CropSilo>,
    open: Option<OpenSilo>,
    ticker: PriceTicker,
    tape: TradeTape,
    clock_ms: u64,
    rng: R,
}

impl<R: RandomSource> TradingRoom<R> {
    pub fn new(silos: Vec<CropSilo>, mut rng: R) -> Result<Self, MarketError> {
        let ticker = PriceTicker::new(&mut rng)?;
        Ok(Self {
            silos,
            open: None,
            ticker,
            tape: TradeTape::new(),
            clock_ms: TAPE_START_MS,
            rng,
        })
    }

    pub fn with_sample_silos(rng: R) -> Result<Self, MarketError> {
        Self::new(sample_silos(), rng)
    }

    pub fn silos(&self) -> &[CropSilo] {
        &self.silos
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn open_silo(&self) -> Option<&CropSilo> {
        self.open.as_ref().map(|o| &self.silos[o.index])
    }

    pub fn ticker(&self) -> &PriceTicker {
        &self.ticker
    }

    pub fn tape(&self) -> &TradeTape {
        &self.tape
    }

    /// Open the room on a silo (by id or label), resetting price and ticket.
    pub fn open(&mut self, key: &str) -> Result<&CropSilo, MarketError> {
        let index = self
            .silos
            .iter()
            .position(|s| s.matches(key))
            .ok_or_else(|| MarketError::UnknownSilo(key.trim().to_string()))?;
        self.ticker.reset(&mut self.rng)?;
        self.tape.clear();
        self.clock_ms = TAPE_START_MS;
        let silo = &self.silos[index];
        self.open = Some(OpenSilo {
            index,
            ticket: SellTicket::new(silo.stock),
        });
        info!(silo = %silo.label, stock = silo.stock, "trading room opened");
        Ok(silo)
    }

    pub fn close(&mut self) {
        if let Some(open) = self.open.take() {
            info!(silo = %self.silos[open.index].label, "trading room closed");
        }
    }

    /// Advance the feed by one interval: new price, new mock trade.
    pub fn tick(&mut self) -> Result<PricePoint, MarketError> {
        if self.open.is_none() {
            return Err(MarketError::NotOpen);
        }
        let point = self.ticker.tick(&mut self.rng)?;
        self.clock_ms += TICK_INTERVAL_MS;
        self.tape
            .record_mock(&mut self.rng, point.price, tape::time_of_day(self.clock_ms));
        debug!(
            index = point.index,
            price = %point.price,
            volume = point.volume,
            "price tick"
        );
        Ok(point)
    }

    /// Drop the up/down highlight once it has been shown long enough.
    pub fn clear_direction_after(&mut self, elapsed_ms: u64) -> bool {
        if elapsed_ms >= FLICKER_MS && self.ticker.direction().is_some() {
            self.ticker.clear_direction();
            return true;
        }
        false
    }

    fn ticket_mut(&mut self) -> Result<&mut SellTicket, MarketError> {
        self.open
            .as_mut()
            .map(|o| &mut o.ticket)
            .ok_or(MarketError::NotOpen)
    }

    pub fn ticket(&self) -> Option<&SellTicket> {
        self.open.as_ref().map(|o| &o.ticket)
    }

    pub fn set_amount(&mut self, amount: u64) -> Result<u64, MarketError> {
        Ok(self.ticket_mut()?.set_amount(amount))
    }

    pub fn sell_all(&mut self) -> Result<u64, MarketError> {
        Ok(self.ticket_mut()?.sell_all())
    }

    /// Proceeds of the ticket at the current price.
    pub fn quote(&self) -> Result<Decimal, MarketError> {
        let ticket = self.ticket().ok_or(MarketError::NotOpen)?;
        Ok(ticket.quote(self.ticker.price()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farm_core::SequenceSource;

    fn room() -> TradingRoom<SequenceSource> {
        TradingRoom::with_sample_silos(SequenceSource::new([0.9, 0.3, 0.6])).unwrap()
    }

    #[test]
    fn closed_room_refuses_work() {
        let mut r = room();
        assert!(!r.is_open());
        assert_eq!(r.tick(), Err(MarketError::NotOpen));
        assert_eq!(r.sell_all(), Err(MarketError::NotOpen));
        assert_eq!(r.quote(), Err(MarketError::NotOpen));
    }

    #[test]
    fn unknown_silo() {
        let mut r = room();
        assert_eq!(
            r.open("rice").unwrap_err(),
            MarketError::UnknownSilo("rice".into())
        );
    }

    #[test]
    fn open_tick_and_quote() {
        let mut r = room();
        assert_eq!(r.open("corn").unwrap().stock, 892);
        assert_eq!(r.ticker().price(), ticker::BASE_PRICE);
        assert_eq!(r.ticket().unwrap().amount(), 0);

        for _ in 0..3 {
            r.tick().unwrap();
        }
        assert_eq!(r.tape().len(), 3);
        let newest = r.tape().iter().next().unwrap();
        assert_eq!(newest.time, tape::time_of_day(TAPE_START_MS + 3 * TICK_INTERVAL_MS));
        assert_eq!(newest.price, r.ticker().price());

        assert_eq!(r.set_amount(10_000).unwrap(), 892);
        assert_eq!(r.set_amount(100).unwrap(), 100);
        assert_eq!(r.quote().unwrap(), Decimal::from(100u64) * r.ticker().price());
        assert_eq!(r.sell_all().unwrap(), 892);

        r.close();
        assert!(r.open_silo().is_none());
    }

    #[test]
    fn reopen_resets_feed() {
        let mut r = room();
        r.open("1").unwrap();
        for _ in 0..4 {
            r.tick().unwrap();
        }
        r.set_amount(5).unwrap();
        r.open("Oats").unwrap();
        assert_eq!(r.ticker().price(), ticker::BASE_PRICE);
        assert_eq!(r.ticker().direction(), None);
        assert!(r.tape().is_empty());
        assert_eq!(r.ticket().unwrap().amount(), 0);
        assert_eq!(r.open_silo().unwrap().label, "Oats");
    }

    #[test]
    fn flicker_clears_after_delay() {
        let mut r = TradingRoom::with_sample_silos(SequenceSource::constant(0.9)).unwrap();
        r.open("wheat").unwrap();
        r.tick().unwrap();
        assert_eq!(r.ticker().direction(), Some(Direction::Up));
        assert!(!r.clear_direction_after(FLICKER_MS - 1));
        assert!(r.clear_direction_after(FLICKER_MS));
        assert_eq!(r.ticker().direction(), None);
    }
}
