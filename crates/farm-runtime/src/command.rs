//! Text commands accepted by a session.

use farm_core::{Region, ValidationError};
use farm_econ::Action;
use farm_market::MarketError;
use std::str::FromStr;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// One of the five economy actions.
    Act(Action),
    Status,
    Ledger,
    Regions,
    MarketOpen(String),
    MarketTick(u32),
    MarketClose,
    SellAll,
    Sell(u64),
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
    #[error("`{command}`: invalid argument `{value}`")]
    BadArgument {
        command: &'static str,
        value: String,
    },
    #[error(transparent)]
    Region(#[from] ValidationError),
    #[error("invalid config: {0}")]
    Config(#[source] ValidationError),
    #[error(transparent)]
    Market(#[from] MarketError),
}

/// A command that failed to parse, with its 1-based script line.
#[derive(Debug, Error, PartialEq)]
#[error("line {line}: {source}")]
pub struct ScriptError {
    pub line: usize,
    #[source]
    pub source: CommandError,
}

fn parse_number<T: FromStr>(command: &'static str, value: &str) -> Result<T, CommandError> {
    value.parse().map_err(|_| CommandError::BadArgument {
        command,
        value: value.to_string(),
    })
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words = s.split_whitespace();
        let head = words.next().ok_or(CommandError::Empty)?.to_ascii_lowercase();
        let rest: Vec<&str> = words.collect();
        let cmd = match (head.as_str(), rest.as_slice()) {
            ("travel", []) => return Err(CommandError::MissingArgument("travel")),
            ("travel", [region]) => Command::Act(Action::Travel(region.parse::<Region>()?)),
            ("plant", []) => Command::Act(Action::Plant),
            ("harvest", []) => Command::Act(Action::Harvest),
            ("upgrade", []) => Command::Act(Action::Upgrade),
            ("boost", []) => Command::Act(Action::Boost),
            ("status", []) => Command::Status,
            ("ledger", []) => Command::Ledger,
            ("regions", []) => Command::Regions,
            ("market", [sub, args @ ..]) => parse_market(sub, args)?,
            ("market", []) => return Err(CommandError::MissingArgument("market")),
            ("sell", []) => return Err(CommandError::MissingArgument("sell")),
            ("sell", [amount]) if amount.eq_ignore_ascii_case("all") => Command::SellAll,
            ("sell", [amount]) => Command::Sell(parse_number("sell", amount)?),
            _ => return Err(CommandError::Unknown(s.trim().to_string())),
        };
        Ok(cmd)
    }
}

fn parse_market(sub: &str, args: &[&str]) -> Result<Command, CommandError> {
    match (sub.to_ascii_lowercase().as_str(), args) {
        ("open", []) => Err(CommandError::MissingArgument("market open")),
        ("open", silo) => Ok(Command::MarketOpen(silo.join(" "))),
        ("tick", []) => Ok(Command::MarketTick(1)),
        ("tick", [n]) => Ok(Command::MarketTick(parse_number("market tick", n)?)),
        ("close", []) => Ok(Command::MarketClose),
        _ => Err(CommandError::BadArgument {
            command: "market",
            value: std::iter::once(sub)
                .chain(args.iter().copied())
                .collect::<Vec<_>>()
                .join(" "),
        }),
    }
}

/// Parse a script: one command per line, blank lines and `#` comments skipped.
pub fn parse_script(text: &str) -> Result<Vec<Command>, ScriptError> {
    let mut out = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let cmd = line
            .parse::<Command>()
            .map_err(|source| ScriptError { line: i + 1, source })?;
        out.push(cmd);
    }
    Ok(out)
}

/// Parse `;`-separated commands, e.g. from the command line.
pub fn parse_inline(text: &str) -> Result<Vec<Command>, ScriptError> {
    parse_script(&text.replace(';', "\n"))
}
