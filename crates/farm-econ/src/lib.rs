#![deny(warnings)]

//! Farm economy: the cash/stars/region state machine for Globe Farm.
//!
//! [`EconomyState`] is the single owner of the player's balances. Every
//! action either applies completely or is rejected with no state change:
//! - `travel` moves to another region for a fixed cash fee
//! - `plant` and `upgrade` spend fixed cash amounts
//! - `harvest` always pays a random reward
//! - `boost` converts stars into a random cash bonus

use farm_core::{
    PriceTable, RandomSource, Region, RegionDescriptor, SeededSource, SessionConfig,
    ValidationError, INITIAL_CASH, INITIAL_STARS,
};
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

pub mod ledger;
pub mod money;
pub mod notify;

pub use ledger::{Ledger, Transaction};
pub use notify::{Level, Notification};

/// Kind of economy action, used for ledger entries and messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Travel,
    Plant,
    Harvest,
    Upgrade,
    Boost,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ActionKind::Travel => "travel",
            ActionKind::Plant => "plant",
            ActionKind::Harvest => "harvest",
            ActionKind::Upgrade => "upgrade",
            ActionKind::Boost => "boost",
        })
    }
}

/// A player request against the economy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Travel(Region),
    Plant,
    Harvest,
    Upgrade,
    Boost,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Travel(_) => ActionKind::Travel,
            Action::Plant => ActionKind::Plant,
            Action::Harvest => ActionKind::Harvest,
            Action::Upgrade => ActionKind::Upgrade,
            Action::Boost => ActionKind::Boost,
        }
    }
}

/// Effect details of an applied action.
#[derive(Clone, Debug, PartialEq)]
pub enum Applied {
    /// Moved to `region`, paying `cost`.
    Traveled {
        region: &'static RegionDescriptor,
        cost: u64,
    },
    /// Seeds planted; `best_crops` is informational.
    Planted {
        region: &'static RegionDescriptor,
        best_crops: &'static [&'static str],
        cost: u64,
    },
    Harvested {
        reward: u64,
    },
    Upgraded {
        cost: u64,
    },
    Boosted {
        stars_spent: u64,
        bonus: u64,
    },
}

impl Applied {
    pub fn kind(&self) -> ActionKind {
        match self {
            Applied::Traveled { .. } => ActionKind::Travel,
            Applied::Planted { .. } => ActionKind::Plant,
            Applied::Harvested { .. } => ActionKind::Harvest,
            Applied::Upgraded { .. } => ActionKind::Upgrade,
            Applied::Boosted { .. } => ActionKind::Boost,
        }
    }

    /// Signed change to cash.
    pub fn cash_delta(&self) -> i64 {
        match self {
            Applied::Traveled { cost, .. }
            | Applied::Planted { cost, .. }
            | Applied::Upgraded { cost } => -to_signed(*cost),
            Applied::Harvested { reward } => to_signed(*reward),
            Applied::Boosted { bonus, .. } => to_signed(*bonus),
        }
    }

    /// Signed change to stars.
    pub fn stars_delta(&self) -> i64 {
        match self {
            Applied::Boosted { stars_spent, .. } => -to_signed(*stars_spent),
            _ => 0,
        }
    }

    /// Ledger line for this effect.
    pub fn description(&self) -> String {
        match self {
            Applied::Traveled { region, .. } => format!("Travel to {}", region.display_name),
            Applied::Planted { .. } => "Seeds planted".to_string(),
            Applied::Harvested { .. } => "Harvest earnings".to_string(),
            Applied::Upgraded { .. } => "Farm upgrade".to_string(),
            Applied::Boosted { .. } => "Star boost bonus".to_string(),
        }
    }
}

// Validated configs keep every amount within `i64::MAX`.
fn to_signed(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

/// Why an action was refused. The state is untouched in every case.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("already in {region}")]
    AlreadyThere { region: Region },
    #[error("insufficient funds to {action}: need {needed}, have {available}")]
    InsufficientFunds {
        action: ActionKind,
        needed: u64,
        available: u64,
    },
    #[error("insufficient stars: need {needed}, have {available}")]
    InsufficientStars { needed: u64, available: u64 },
}

/// Result of an economy operation.
pub type Outcome = Result<Applied, Rejection>;

/// Sole owner of cash, stars and the current region.
#[derive(Clone, Debug)]
pub struct EconomyState<R = SeededSource> {
    cash: u64,
    stars: u64,
    region: Region,
    prices: PriceTable,
    ledger: Ledger,
    rng: R,
}

impl EconomyState<SeededSource> {
    /// Build from a config, seeding from `rng_seed` or OS entropy.
    pub fn from_config(cfg: &SessionConfig) -> Result<Self, ValidationError> {
        Self::with_config(cfg, SeededSource::from_seed_opt(cfg.rng_seed))
    }
}

impl<R: RandomSource> EconomyState<R> {
    /// Fresh session: 400,000 cash, 100 stars, starting in Africa.
    pub fn new(rng: R) -> Self {
        Self::with_balances(INITIAL_CASH, INITIAL_STARS, Region::default(), rng)
    }

    pub fn with_config(cfg: &SessionConfig, rng: R) -> Result<Self, ValidationError> {
        cfg.validate()?;
        let mut state = Self::with_balances(cfg.initial_cash, cfg.initial_stars, cfg.start_region, rng);
        state.prices = cfg.prices.clone();
        info!(
            cash = state.cash,
            stars = state.stars,
            region = state.region.id(),
            "economy initialized"
        );
        Ok(state)
    }

    /// Arbitrary starting balances with default prices.
    pub fn with_balances(cash: u64, stars: u64, region: Region, rng: R) -> Self {
        Self {
            cash,
            stars,
            region,
            prices: PriceTable::default(),
            ledger: Ledger::new(),
            rng,
        }
    }

    pub fn cash(&self) -> u64 {
        self.cash
    }

    pub fn stars(&self) -> u64 {
        self.stars
    }

    pub fn current_region(&self) -> Region {
        self.region
    }

    pub fn current_region_data(&self) -> &'static RegionDescriptor {
        self.region.descriptor()
    }

    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Dispatch an [`Action`] to its operation.
    pub fn apply(&mut self, action: Action) -> Outcome {
        match action {
            Action::Travel(target) => self.travel(target),
            Action::Plant => self.plant(),
            Action::Harvest => self.harvest(),
            Action::Upgrade => self.upgrade(),
            Action::Boost => self.boost(),
        }
    }

    pub fn travel(&mut self, target: Region) -> Outcome {
        let outcome = if target == self.region {
            Err(Rejection::AlreadyThere { region: target })
        } else {
            let cost = self.prices.travel_cost;
            self.debit_cash(ActionKind::Travel, cost).map(|()| {
                self.region = target;
                Applied::Traveled {
                    region: target.descriptor(),
                    cost,
                }
            })
        };
        self.settle(outcome)
    }

    pub fn plant(&mut self) -> Outcome {
        let cost = self.prices.plant_cost;
        let outcome = self.debit_cash(ActionKind::Plant, cost).map(|()| {
            let region = self.region.descriptor();
            Applied::Planted {
                region,
                best_crops: region.best_crops,
                cost,
            }
        });
        self.settle(outcome)
    }

    pub fn harvest(&mut self) -> Outcome {
        let drawn = self.rng.draw(self.prices.harvest_reward);
        let reward = self.credit_cash(drawn);
        self.settle(Ok(Applied::Harvested { reward }))
    }

    pub fn upgrade(&mut self) -> Outcome {
        let cost = self.prices.upgrade_cost;
        let outcome = self
            .debit_cash(ActionKind::Upgrade, cost)
            .map(|()| Applied::Upgraded { cost });
        self.settle(outcome)
    }

    pub fn boost(&mut self) -> Outcome {
        let needed = self.prices.boost_star_cost;
        let outcome = match self.stars.checked_sub(needed) {
            None => Err(Rejection::InsufficientStars {
                needed,
                available: self.stars,
            }),
            Some(remaining) => {
                self.stars = remaining;
                let drawn = self.rng.draw(self.prices.boost_bonus);
                let bonus = self.credit_cash(drawn);
                Ok(Applied::Boosted {
                    stars_spent: needed,
                    bonus,
                })
            }
        };
        self.settle(outcome)
    }

    // Deducts only when the full amount is available.
    fn debit_cash(&mut self, action: ActionKind, cost: u64) -> Result<(), Rejection> {
        match self.cash.checked_sub(cost) {
            Some(remaining) => {
                self.cash = remaining;
                Ok(())
            }
            None => Err(Rejection::InsufficientFunds {
                action,
                needed: cost,
                available: self.cash,
            }),
        }
    }

    // Credits at most the headroom below `u64::MAX`; returns what was added.
    fn credit_cash(&mut self, amount: u64) -> u64 {
        let credited = amount.min(u64::MAX - self.cash);
        self.cash += credited;
        credited
    }

    fn settle(&mut self, outcome: Outcome) -> Outcome {
        match &outcome {
            Ok(applied) => {
                let tx = self.ledger.record(
                    applied.kind(),
                    applied.cash_delta(),
                    applied.stars_delta(),
                    applied.description(),
                );
                info!(
                    seq = tx.seq,
                    action = %tx.kind,
                    cash_delta = tx.cash_delta,
                    stars_delta = tx.stars_delta,
                    cash = self.cash,
                    stars = self.stars,
                    region = self.region.id(),
                    "action applied"
                );
            }
            Err(rejection) => {
                debug!(%rejection, cash = self.cash, stars = self.stars, "action rejected");
            }
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use farm_core::{RewardRange, SequenceSource};
    use proptest::prelude::*;

    type TestState = EconomyState<SequenceSource>;

    fn state(cash: u64, stars: u64, region: Region) -> TestState {
        EconomyState::with_balances(cash, stars, region, SequenceSource::constant(0.5))
    }

    fn snapshot(s: &TestState) -> (u64, u64, Region) {
        (s.cash(), s.stars(), s.current_region())
    }

    #[test]
    fn starts_with_session_defaults() {
        let s = EconomyState::new(SequenceSource::default());
        assert_eq!(snapshot(&s), (400_000, 100, Region::Africa));
        assert!(s.ledger().is_empty());
    }

    #[test]
    fn scenario_from_fresh_session() {
        let mut s = EconomyState::new(SequenceSource::constant(0.5));
        match s.travel(Region::Europe) {
            Ok(Applied::Traveled { region, cost }) => {
                assert_eq!(region.region, Region::Europe);
                assert_eq!(cost, 5_000);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(snapshot(&s), (395_000, 100, Region::Europe));

        assert!(s.plant().is_ok());
        assert_eq!(s.cash(), 394_000);
        assert!(s.upgrade().is_ok());
        assert_eq!(s.cash(), 384_000);

        let bonus = match s.boost() {
            Ok(Applied::Boosted { bonus, stars_spent }) => {
                assert_eq!(stars_spent, 10);
                bonus
            }
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(bonus, 10_000);
        assert_eq!(s.stars(), 90);
        assert_eq!(s.cash(), 394_000);
        assert_eq!(s.ledger().len(), 4);
    }

    #[test]
    fn travel_to_current_region_is_already_there_even_when_broke() {
        let mut s = state(0, 0, Region::Americas);
        assert_eq!(
            s.travel(Region::Americas),
            Err(Rejection::AlreadyThere {
                region: Region::Americas
            })
        );
        assert_eq!(snapshot(&s), (0, 0, Region::Americas));
    }

    #[test]
    fn travel_needs_full_fee() {
        let mut s = state(4_999, 100, Region::Africa);
        assert_eq!(
            s.travel(Region::Europe),
            Err(Rejection::InsufficientFunds {
                action: ActionKind::Travel,
                needed: 5_000,
                available: 4_999
            })
        );
        assert_eq!(snapshot(&s), (4_999, 100, Region::Africa));

        let mut exact = state(5_000, 0, Region::Africa);
        assert!(exact.travel(Region::Americas).is_ok());
        assert_eq!(snapshot(&exact), (0, 0, Region::Americas));
    }

    #[test]
    fn plant_reports_current_crops() {
        let mut s = state(1_000, 0, Region::Africa);
        match s.plant() {
            Ok(Applied::Planted { best_crops, .. }) => {
                assert_eq!(best_crops, &["Coffee", "Cocoa"])
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(s.cash(), 0);
        assert!(matches!(
            s.plant(),
            Err(Rejection::InsufficientFunds {
                action: ActionKind::Plant,
                ..
            })
        ));
    }

    #[test]
    fn harvest_boundaries() {
        let mut s = EconomyState::with_balances(
            0,
            0,
            Region::Africa,
            SequenceSource::new([0.0, 0.999_999_999]),
        );
        assert_eq!(s.harvest(), Ok(Applied::Harvested { reward: 2_000 }));
        assert_eq!(s.harvest(), Ok(Applied::Harvested { reward: 6_999 }));
        assert_eq!(s.cash(), 8_999);
        assert_eq!(s.stars(), 0);
    }

    #[test]
    fn boost_without_stars_leaves_cash() {
        let mut s = state(50, 9, Region::Europe);
        assert_eq!(
            s.boost(),
            Err(Rejection::InsufficientStars {
                needed: 10,
                available: 9
            })
        );
        assert_eq!(snapshot(&s), (50, 9, Region::Europe));
    }

    #[test]
    fn boost_boundaries() {
        let mut s = EconomyState::with_balances(
            0,
            20,
            Region::Africa,
            SequenceSource::new([0.0, 0.999_999_999]),
        );
        assert_eq!(s.boost().map(|a| a.cash_delta()), Ok(5_000));
        assert_eq!(s.boost().map(|a| a.cash_delta()), Ok(14_999));
        assert_eq!(s.stars(), 0);
    }

    #[test]
    fn credits_stop_at_balance_ceiling() {
        let mut s = EconomyState::with_balances(
            u64::MAX - 100,
            10,
            Region::Africa,
            SequenceSource::constant(0.0),
        );
        let harvested = s.harvest().unwrap();
        assert_eq!(harvested, Applied::Harvested { reward: 100 });
        assert_eq!(s.cash(), u64::MAX);
        assert_eq!(s.ledger().latest().map(|t| t.cash_delta), Some(100));

        let boosted = s.boost().unwrap();
        assert_eq!(
            boosted,
            Applied::Boosted {
                stars_spent: 10,
                bonus: 0
            }
        );
        assert_eq!(s.cash(), u64::MAX);
        assert_eq!(s.stars(), 0);
        assert_eq!(s.ledger().latest().map(|t| t.cash_delta), Some(0));
    }

    #[test]
    fn upgrade_needs_ten_thousand() {
        let mut s = state(9_999, 0, Region::Africa);
        assert!(s.upgrade().is_err());
        assert_eq!(s.cash(), 9_999);
        let mut s = state(10_000, 0, Region::Africa);
        assert_eq!(s.upgrade(), Ok(Applied::Upgraded { cost: 10_000 }));
        assert_eq!(s.cash(), 0);
    }

    #[test]
    fn ledger_tracks_applied_only() {
        let mut s = state(6_000, 5, Region::Africa);
        s.travel(Region::Europe).unwrap();
        assert!(s.travel(Region::Americas).is_err());
        assert!(s.boost().is_err());
        s.plant().unwrap();
        let lines: Vec<&str> = s.ledger().iter().map(|t| t.description.as_str()).collect();
        assert_eq!(lines, vec!["Seeds planted", "Travel to Europe"]);
        assert_eq!(s.ledger().net_cash(), -6_000);
    }

    #[test]
    fn config_prices_are_used() {
        let mut cfg = SessionConfig::default();
        cfg.initial_cash = 100;
        cfg.start_region = Region::Americas;
        cfg.prices.travel_cost = 100;
        cfg.prices.harvest_reward = RewardRange::new(1, 2);
        let mut s = EconomyState::with_config(&cfg, SequenceSource::constant(0.7)).unwrap();
        assert!(s.travel(Region::Africa).is_ok());
        assert_eq!(s.cash(), 0);
        assert_eq!(s.harvest(), Ok(Applied::Harvested { reward: 1 }));
    }

    #[test]
    fn invalid_config_rejected() {
        let mut cfg = SessionConfig::default();
        cfg.prices.harvest_reward = RewardRange::new(5, 5);
        assert!(EconomyState::with_config(&cfg, SequenceSource::default()).is_err());
    }

    #[test]
    fn seeded_config_is_reproducible() {
        let cfg = SessionConfig {
            rng_seed: Some(9),
            ..SessionConfig::default()
        };
        let mut a = EconomyState::from_config(&cfg).unwrap();
        let mut b = EconomyState::from_config(&cfg).unwrap();
        for _ in 0..5 {
            assert_eq!(a.harvest(), b.harvest());
        }
    }

    fn arb_action() -> impl Strategy<Value = Action> {
        prop_oneof![
            (0usize..3).prop_map(|i| Action::Travel(Region::ALL[i])),
            Just(Action::Plant),
            Just(Action::Harvest),
            Just(Action::Upgrade),
            Just(Action::Boost),
        ]
    }

    proptest! {
        #[test]
        fn rejection_never_mutates(cash in 0u64..20_000, stars in 0u64..30,
                                   region in 0usize..3, unit in 0.0f64..1.0,
                                   action in arb_action()) {
            let mut s = EconomyState::with_balances(cash, stars, Region::ALL[region], SequenceSource::constant(unit));
            let before = (s.cash(), s.stars(), s.current_region());
            let ledger_before = s.ledger().len();
            match s.apply(action) {
                Err(_) => {
                    prop_assert_eq!((s.cash(), s.stars(), s.current_region()), before);
                    prop_assert_eq!(s.ledger().len(), ledger_before);
                }
                Ok(applied) => {
                    prop_assert_eq!(s.cash() as i64 - before.0 as i64, applied.cash_delta());
                    prop_assert_eq!(s.stars() as i64 - before.1 as i64, applied.stars_delta());
                    prop_assert_eq!(s.ledger().latest().map(|t| t.cash_delta), Some(applied.cash_delta()));
                }
            }
        }

        #[test]
        fn travel_rules(cash in 0u64..20_000, from in 0usize..3, to in 0usize..3) {
            let (from, to) = (Region::ALL[from], Region::ALL[to]);
            let mut s = EconomyState::with_balances(cash, 0, from, SequenceSource::default());
            let outcome = s.travel(to);
            if from == to {
                prop_assert_eq!(outcome, Err(Rejection::AlreadyThere { region: to }));
            } else if cash < 5_000 {
                prop_assert!(
                    matches!(outcome, Err(Rejection::InsufficientFunds { .. })),
                    "expected InsufficientFunds"
                );
            } else {
                prop_assert!(outcome.is_ok());
                prop_assert_eq!(s.cash(), cash - 5_000);
                prop_assert_eq!(s.current_region(), to);
            }
        }

        #[test]
        fn harvest_and_boost_stay_in_range(seed in any::<u64>(), stars in 10u64..1_000) {
            let mut s = EconomyState::with_balances(0, stars, Region::Africa, SeededSource::seeded(seed));
            let before = s.cash();
            s.harvest().unwrap();
            let reward = s.cash() - before;
            prop_assert!((2_000..7_000).contains(&reward));
            let before = s.cash();
            s.boost().unwrap();
            let bonus = s.cash() - before;
            prop_assert!((5_000..15_000).contains(&bonus));
            prop_assert_eq!(s.stars(), stars - 10);
        }
    }
}
