#![deny(warnings)]

//! Session runtime: one economy plus one trading room, driven by text
//! commands from the presentation layer.

use farm_core::{regions, RandomSource, Region, SeededSource, SessionConfig};
use farm_econ::money::{format_compact, format_delta, format_money};
use farm_econ::{EconomyState, Notification};
use farm_market::{Direction, MarketError, PricePoint, TradingRoom, TICK_INTERVAL_MS};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

pub mod command;

pub use command::{parse_inline, parse_script, Command, CommandError, ScriptError};

/// Mixed into the session seed so the market stream differs from rewards.
const MARKET_STREAM: u64 = 0x6d61_726b_6574;
/// Most ticks a single `market tick` command may request.
pub const MAX_TICKS_PER_COMMAND: u32 = 1_000;

/// What a command produced: at most one notification plus detail lines.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    pub notification: Option<Notification>,
    pub lines: Vec<String>,
}

impl Report {
    fn notify(notification: Notification) -> Self {
        Self {
            notification: Some(notification),
            lines: Vec::new(),
        }
    }

    fn lines(lines: Vec<String>) -> Self {
        Self {
            notification: None,
            lines,
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        if let Some(n) = &self.notification {
            write!(f, "{n}")?;
            first = false;
        }
        for line in &self.lines {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{line}")?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MarketSnapshot {
    pub silo: String,
    pub price: Decimal,
    pub direction: Option<Direction>,
    pub amount: u64,
}

/// Read-only view of a session for status output.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub cash: u64,
    pub stars: u64,
    pub region: Region,
    pub region_name: &'static str,
    pub transactions: u64,
    pub market: Option<MarketSnapshot>,
}

pub struct Session<R = SeededSource> {
    economy: EconomyState<R>,
    market: TradingRoom<R>,
}

impl Session<SeededSource> {
    /// Build from config. A configured seed makes both streams reproducible.
    pub fn from_config(cfg: &SessionConfig) -> Result<Self, CommandError> {
        let econ_rng = SeededSource::from_seed_opt(cfg.rng_seed);
        let market_rng = SeededSource::from_seed_opt(cfg.rng_seed.map(|s| s ^ MARKET_STREAM));
        Self::with_sources(cfg, econ_rng, market_rng)
    }
}

impl<R: RandomSource> Session<R> {
    pub fn with_sources(
        cfg: &SessionConfig,
        econ_rng: R,
        market_rng: R,
    ) -> Result<Self, CommandError> {
        let economy = EconomyState::with_config(cfg, econ_rng).map_err(CommandError::Config)?;
        let market = TradingRoom::with_sample_silos(market_rng)?;
        info!(seeded = cfg.rng_seed.is_some(), "session started");
        Ok(Self { economy, market })
    }

    pub fn economy(&self) -> &EconomyState<R> {
        &self.economy
    }

    pub fn market(&self) -> &TradingRoom<R> {
        &self.market
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let market = self.market.open_silo().map(|silo| MarketSnapshot {
            silo: silo.label.clone(),
            price: self.market.ticker().price(),
            direction: self.market.ticker().direction(),
            amount: self.market.ticket().map_or(0, |t| t.amount()),
        });
        SessionSnapshot {
            cash: self.economy.cash(),
            stars: self.economy.stars(),
            region: self.economy.current_region(),
            region_name: self.economy.current_region_data().display_name,
            transactions: self.economy.ledger().total_recorded(),
            market,
        }
    }

    /// Run one command. Economy rejections come back as reports; only
    /// market misuse (closed room, unknown silo) is an error.
    pub fn execute(&mut self, cmd: &Command) -> Result<Report, CommandError> {
        debug!(?cmd, "execute");
        // Each command lands at least one tick interval after the previous
        // one, so an earlier price highlight has expired.
        self.market.clear_direction_after(TICK_INTERVAL_MS);
        let report = match cmd {
            Command::Act(action) => {
                Report::notify(Notification::from_outcome(&self.economy.apply(*action)))
            }
            Command::Status => Report::lines(self.status_lines()),
            Command::Ledger => Report::lines(self.ledger_lines()),
            Command::Regions => Report::lines(self.region_lines()),
            Command::MarketOpen(key) => {
                let (label, stock) = {
                    let silo = self.market.open(key)?;
                    (silo.label.clone(), silo.stock)
                };
                Report::lines(vec![format!(
                    "Trading room: {label} (stock {stock}) @ {:.2}",
                    self.market.ticker().price()
                )])
            }
            Command::MarketTick(n) => {
                if !self.market.is_open() {
                    return Err(MarketError::NotOpen.into());
                }
                if *n > MAX_TICKS_PER_COMMAND {
                    return Err(CommandError::BadArgument {
                        command: "market tick",
                        value: n.to_string(),
                    });
                }
                let mut lines = Vec::new();
                for _ in 0..*n {
                    let point = self.market.tick()?;
                    lines.push(self.tick_line(&point));
                }
                Report::lines(lines)
            }
            Command::MarketClose => {
                if !self.market.is_open() {
                    return Err(MarketError::NotOpen.into());
                }
                self.market.close();
                Report::lines(vec!["Trading room closed".to_string()])
            }
            Command::SellAll => {
                self.market.sell_all()?;
                Report::lines(vec![self.ticket_line()?])
            }
            Command::Sell(amount) => {
                self.market.set_amount(*amount)?;
                Report::lines(vec![self.ticket_line()?])
            }
        };
        Ok(report)
    }

    /// Execute commands in order, stopping at the first error.
    pub fn run(&mut self, cmds: &[Command]) -> Result<Vec<Report>, CommandError> {
        cmds.iter().map(|cmd| self.execute(cmd)).collect()
    }

    fn status_lines(&self) -> Vec<String> {
        let e = &self.economy;
        let region = e.current_region_data();
        let mut lines = vec![
            format!(
                "Cash: {} ({}) | Stars: {}",
                format_money(e.cash()),
                format_compact(i64::try_from(e.cash()).unwrap_or(i64::MAX)),
                e.stars()
            ),
            format!(
                "Region: {} | Soil pH {} | {} | Best crops: {}",
                region.display_name,
                region.ph_range,
                region.soil_type,
                region.best_crops.join(", ")
            ),
        ];
        if let Some(silo) = self.market.open_silo() {
            lines.push(format!(
                "Trading {} @ {:.2}",
                silo.label,
                self.market.ticker().price()
            ));
        }
        lines
    }

    fn ledger_lines(&self) -> Vec<String> {
        let ledger = self.economy.ledger();
        if ledger.is_empty() {
            return vec!["No transactions yet".to_string()];
        }
        ledger
            .iter()
            .map(|t| {
                let mut line = format!("#{} {} {}", t.seq, format_delta(t.cash_delta), t.description);
                if t.stars_delta != 0 {
                    line.push_str(&format!(" ({:+} stars)", t.stars_delta));
                }
                line
            })
            .collect()
    }

    fn region_lines(&self) -> Vec<String> {
        let here = self.economy.current_region();
        regions()
            .iter()
            .map(|d| {
                format!(
                    "{} {:<9} pH {:<8} {:<18} {}",
                    if d.region == here { "*" } else { " " },
                    d.region.id(),
                    d.ph_range.to_string(),
                    d.soil_type,
                    d.best_crops.join(", ")
                )
            })
            .collect()
    }

    fn tick_line(&self, point: &PricePoint) -> String {
        let arrow = match self.market.ticker().direction() {
            Some(Direction::Up) => "up",
            Some(Direction::Down) => "down",
            None => "flat",
        };
        let mut line = format!(
            "t{:<3} {:.2} {:<4} vol {}",
            point.index, point.price, arrow, point.volume
        );
        if let Some(trade) = self.market.tape().iter().next() {
            line.push_str(&format!(" | {trade}"));
        }
        line
    }

    fn ticket_line(&self) -> Result<String, CommandError> {
        let silo = self.market.open_silo().ok_or(MarketError::NotOpen)?;
        let amount = self.market.ticket().map_or(0, |t| t.amount());
        Ok(format!(
            "Selected {} of {} {} | quote ${:.2}",
            amount,
            silo.stock,
            silo.label,
            self.market.quote()?
        ))
    }
}
